use std::fmt;

/// Raw latitude/longitude extent of a set of points, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Extent {
    fn of_point(lat: f64, lon: f64) -> Self {
        Self {
            min_lat: lat,
            max_lat: lat,
            min_lon: lon,
            max_lon: lon,
        }
    }

    /// Grow the extent to cover another point
    pub fn include(self, lat: f64, lon: f64) -> Self {
        Self {
            min_lat: self.min_lat.min(lat),
            max_lat: self.max_lat.max(lat),
            min_lon: self.min_lon.min(lon),
            max_lon: self.max_lon.max(lon),
        }
    }

    /// Fold `(lat, lon)` points into an extent. `None` for an empty input.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        points.into_iter().fold(None, |extent, (lat, lon)| {
            Some(match extent {
                Some(e) => e.include(lat, lon),
                None => Self::of_point(lat, lon),
            })
        })
    }
}

/// Overpass bounding box: `(south, west, north, east)` in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Pad an extent by `buffer` degrees on every side
    pub fn buffered(extent: &Extent, buffer: f64) -> Self {
        Self {
            south: extent.min_lat - buffer,
            west: extent.min_lon - buffer,
            north: extent.max_lat + buffer,
            east: extent.max_lon + buffer,
        }
    }
}

/// Overpass QL form, `south,west,north,east`
impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}
