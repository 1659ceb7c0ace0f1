use geojson::{Feature, Geometry, JsonObject};

use super::Category;
use crate::api::Element;
use crate::geometry::element_geometry;

/// A categorized airport feature ready for GeoJSON output
#[derive(Debug, Clone, PartialEq)]
pub struct AirportFeature {
    pub geometry: Geometry,
    pub category: Category,
    pub osm_id: u64,
    pub osm_type: &'static str,
    pub name: Option<String>,
    pub reference: Option<String>,
    pub aeroway: Option<String>,
    pub building: Option<String>,
    pub operator: Option<String>,
}

impl AirportFeature {
    /// GeoJSON properties: category and source ids, plus whichever of
    /// name/ref/aeroway/building/operator were tagged
    pub fn properties(&self) -> JsonObject {
        let mut props = JsonObject::new();
        props.insert("category".to_string(), self.category.as_str().into());
        props.insert("osm_id".to_string(), self.osm_id.into());
        props.insert("osm_type".to_string(), self.osm_type.into());

        let optional = [
            ("name", &self.name),
            ("ref", &self.reference),
            ("aeroway", &self.aeroway),
            ("building", &self.building),
            ("operator", &self.operator),
        ];
        for (key, value) in optional {
            if let Some(v) = value {
                props.insert(key.to_string(), v.as_str().into());
            }
        }

        props
    }

    pub fn to_geojson(&self) -> Feature {
        Feature {
            bbox: None,
            geometry: Some(self.geometry.clone()),
            id: None,
            properties: Some(self.properties()),
            foreign_members: None,
        }
    }
}

/// Build a feature from an OSM element. Elements without a usable geometry
/// are dropped.
pub fn build_feature(element: &Element) -> Option<AirportFeature> {
    let geometry = element_geometry(element)?;
    let osm_id = element.id()?;
    let tags = element.tags().cloned().unwrap_or_default();

    Some(AirportFeature {
        geometry,
        category: Category::from_aeroway_tag(tags.aeroway.as_deref()),
        osm_id,
        osm_type: element.kind(),
        name: tags.name,
        reference: tags.reference,
        aeroway: tags.aeroway,
        building: tags.building,
        operator: tags.operator,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{OverpassResponse, Tags};
    use serde_json::json;

    fn parse(element: serde_json::Value) -> Element {
        let response: OverpassResponse =
            serde_json::from_value(json!({ "elements": [element] })).unwrap();
        response.elements.into_iter().next().unwrap()
    }

    #[test]
    fn test_gate_feature() {
        let element = parse(json!({
            "type": "node", "id": 42, "lat": 40.64, "lon": -73.78,
            "tags": {"aeroway": "gate", "ref": "B22", "name": "Gate B22", "level": "1"}
        }));
        let feature = build_feature(&element).unwrap();

        assert_eq!(feature.category, Category::Gate);
        assert_eq!(feature.osm_id, 42);
        assert_eq!(feature.osm_type, "node");

        let props = feature.properties();
        assert_eq!(props["category"], json!("gate"));
        assert_eq!(props["osm_id"], json!(42));
        assert_eq!(props["osm_type"], json!("node"));
        assert_eq!(props["ref"], json!("B22"));
        assert_eq!(props["name"], json!("Gate B22"));
        assert_eq!(props["aeroway"], json!("gate"));
        assert!(!props.contains_key("building"));
        assert!(!props.contains_key("operator"));
        assert!(!props.contains_key("level"));
        assert_eq!(props.len(), 6);
    }

    #[test]
    fn test_terminal_way_feature() {
        let element = parse(json!({
            "type": "way", "id": 7,
            "geometry": [
                {"lat": 0.0, "lon": 0.0}, {"lat": 0.0, "lon": 1.0},
                {"lat": 1.0, "lon": 1.0}, {"lat": 0.0, "lon": 0.0}
            ],
            "tags": {"aeroway": "terminal", "building": "yes", "operator": "Port Authority"}
        }));
        let feature = build_feature(&element).unwrap();
        let gj_feature = feature.to_geojson();

        assert_eq!(feature.category, Category::Terminal);
        assert!(matches!(
            gj_feature.geometry.unwrap().value,
            geojson::Value::Polygon(_)
        ));
        let props = gj_feature.properties.unwrap();
        assert_eq!(props["building"], json!("yes"));
        assert_eq!(props["operator"], json!("Port Authority"));
        assert_eq!(props["osm_type"], json!("way"));
    }

    #[test]
    fn test_untagged_feature_is_unknown() {
        let element = Element::Node {
            id: 1,
            lat: 1.0,
            lon: 2.0,
            tags: Tags::default(),
        };
        let feature = build_feature(&element).unwrap();
        assert_eq!(feature.category, Category::Unknown);
        assert_eq!(feature.properties()["category"], json!("unknown"));
    }

    #[test]
    fn test_element_without_geometry_dropped() {
        let element = parse(json!({
            "type": "relation", "id": 3,
            "members": [{"type": "way", "role": "inner", "geometry": [{"lat": 0.0, "lon": 0.0}]}],
            "tags": {"aeroway": "apron"}
        }));
        assert!(build_feature(&element).is_none());
    }
}
