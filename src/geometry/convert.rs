use geojson::{Geometry, Value};

use crate::api::{Element, LatLon};

/// Convert an OSM element into a GeoJSON geometry.
///
/// - node -> Point
/// - way -> Polygon when closed with at least 4 points, LineString otherwise
/// - relation -> Polygon (one outer ring) or MultiPolygon (several)
///
/// Inner rings are not represented. Anything else yields `None`.
pub fn element_geometry(element: &Element) -> Option<Geometry> {
    let value = match element {
        Element::Node { lat, lon, .. } => Value::Point(vec![*lon, *lat]),
        Element::Way {
            geometry: Some(points),
            ..
        } => way_value(points)?,
        Element::Relation {
            members: Some(members),
            ..
        } => {
            let mut outer_rings: Vec<Vec<Vec<f64>>> = members
                .iter()
                .filter(|m| m.role == "outer")
                .filter_map(|m| m.geometry.as_deref())
                .map(to_positions)
                .collect();

            match outer_rings.len() {
                0 => return None,
                1 => Value::Polygon(vec![outer_rings.remove(0)]),
                _ => Value::MultiPolygon(outer_rings.into_iter().map(|ring| vec![ring]).collect()),
            }
        }
        _ => return None,
    };

    Some(Geometry::new(value))
}

fn way_value(points: &[LatLon]) -> Option<Value> {
    let coords = to_positions(points);
    let first = coords.first()?;
    let last = coords.last()?;

    if first == last && coords.len() >= 4 {
        Some(Value::Polygon(vec![coords]))
    } else {
        Some(Value::LineString(coords))
    }
}

/// `[lon, lat]` positions in GeoJSON order
fn to_positions(points: &[LatLon]) -> Vec<Vec<f64>> {
    points.iter().map(|p| vec![p.lon, p.lat]).collect()
}
