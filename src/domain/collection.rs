use geojson::{FeatureCollection, JsonObject};
use serde_json::json;

use super::AirportFeature;

pub const CRS84: &str = "urn:ogc:def:crs:OGC:1.3:CRS84";

/// A named collection of airport features
#[derive(Debug, Clone, PartialEq)]
pub struct AirportCollection {
    pub name: String,
    pub features: Vec<AirportFeature>,
}

impl AirportCollection {
    pub fn new(name: impl Into<String>, features: Vec<AirportFeature>) -> Self {
        Self {
            name: name.into(),
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// GeoJSON FeatureCollection carrying `name` and a CRS84 `crs` block
    pub fn to_geojson(&self) -> FeatureCollection {
        let mut foreign = JsonObject::new();
        foreign.insert("name".to_string(), self.name.clone().into());
        foreign.insert(
            "crs".to_string(),
            json!({
                "type": "name",
                "properties": { "name": CRS84 }
            }),
        );

        FeatureCollection {
            bbox: None,
            features: self.features.iter().map(AirportFeature::to_geojson).collect(),
            foreign_members: Some(foreign),
        }
    }
}
