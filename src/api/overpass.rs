use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::retry::with_retry;
use crate::config::OverpassConfig;
use crate::geometry::{BoundingBox, Extent};

const USER_AGENT: &str = concat!("aeroway-export/", env!("CARGO_PKG_VERSION"));

/// Padding added around the aerodrome outline, in degrees
pub const AIRPORT_BBOX_BUFFER: f64 = 0.005;

#[derive(Debug, thiserror::Error)]
pub enum OverpassError {
    #[error("Failed to create HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("Overpass API returned error status: {status}")]
    Status { status: u16 },

    #[error("Overpass API request timed out")]
    Timeout,

    #[error("Failed to send request to Overpass API")]
    Request(#[source] reqwest::Error),

    #[error("Failed to read Overpass response body")]
    Body(#[source] reqwest::Error),

    #[error("Failed to parse Overpass JSON response")]
    Decode(#[from] serde_json::Error),
}

impl OverpassError {
    /// HTTP error statuses and timeouts are worth another attempt
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::Timeout)
    }
}

/// Raw Overpass API response
#[derive(Debug, Default, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// A single element from an `out geom` Overpass query
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Node {
        id: u64,
        lat: f64,
        lon: f64,
        #[serde(default)]
        tags: Tags,
    },
    Way {
        id: u64,
        #[serde(default)]
        geometry: Option<Vec<LatLon>>,
        #[serde(default)]
        tags: Tags,
    },
    Relation {
        id: u64,
        #[serde(default)]
        members: Option<Vec<Member>>,
        #[serde(default)]
        tags: Tags,
    },
    #[serde(other)]
    Unknown,
}

impl Element {
    pub fn id(&self) -> Option<u64> {
        match self {
            Element::Node { id, .. } | Element::Way { id, .. } | Element::Relation { id, .. } => {
                Some(*id)
            }
            Element::Unknown => None,
        }
    }

    /// OSM element type as it appears on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Node { .. } => "node",
            Element::Way { .. } => "way",
            Element::Relation { .. } => "relation",
            Element::Unknown => "unknown",
        }
    }

    pub fn tags(&self) -> Option<&Tags> {
        match self {
            Element::Node { tags, .. }
            | Element::Way { tags, .. }
            | Element::Relation { tags, .. } => Some(tags),
            Element::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// Relation member with its resolved geometry
#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub geometry: Option<Vec<LatLon>>,
}

/// OSM tags. Keys this tool reads are typed, everything else is kept in `other`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Tags {
    pub aeroway: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    pub building: Option<String>,
    pub operator: Option<String>,
    #[serde(flatten)]
    pub other: HashMap<String, String>,
}

/// Sends a raw Overpass QL query and returns the response body
pub trait OverpassTransport {
    fn post_query(&self, query: &str, timeout: Duration) -> Result<String, OverpassError>;
}

impl<T: OverpassTransport + ?Sized> OverpassTransport for &T {
    fn post_query(&self, query: &str, timeout: Duration) -> Result<String, OverpassError> {
        (**self).post_query(query, timeout)
    }
}

/// Blocking HTTP transport against a single interpreter endpoint
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>) -> Result<Self, OverpassError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(OverpassError::Client)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl OverpassTransport for HttpTransport {
    fn post_query(&self, query: &str, timeout: Duration) -> Result<String, OverpassError> {
        // Overpass expects the query form-encoded as data=<query>
        let response = self
            .client
            .post(&self.url)
            .timeout(timeout)
            .form(&[("data", query)])
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    OverpassError::Timeout
                } else {
                    OverpassError::Request(e)
                }
            })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(OverpassError::Status {
                status: status.as_u16(),
            });
        }

        response.text().map_err(|e| {
            if e.is_timeout() {
                OverpassError::Timeout
            } else {
                OverpassError::Body(e)
            }
        })
    }
}

/// Overpass client with retry and backoff
pub struct OverpassClient<T = HttpTransport> {
    transport: T,
    config: OverpassConfig,
    sleep: Box<dyn Fn(Duration)>,
}

impl OverpassClient<HttpTransport> {
    pub fn from_config(config: OverpassConfig) -> Result<Self, OverpassError> {
        let transport = HttpTransport::new(config.url.clone())?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: OverpassTransport> OverpassClient<T> {
    pub fn with_transport(transport: T, config: OverpassConfig) -> Self {
        Self {
            transport,
            config,
            sleep: Box::new(std::thread::sleep),
        }
    }

    /// Replace the function used to wait between attempts
    pub fn with_sleep(mut self, sleep: impl Fn(Duration) + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    /// Execute a query, retrying transient failures
    pub fn query(&self, query: &str, timeout: Duration) -> Result<OverpassResponse, OverpassError> {
        let policy = self.config.retry_policy();
        let body = with_retry(&policy, &*self.sleep, |attempt| {
            tracing::debug!(attempt, "Sending Overpass query:\n{}", query.trim());
            self.transport.post_query(query, timeout)
        })?;

        Ok(serde_json::from_str(&body)?)
    }

    /// Bounding box of the aerodrome tagged with `icao`, padded by
    /// [`AIRPORT_BBOX_BUFFER`]. `None` when the airport is not mapped.
    pub fn get_airport_bbox(&self, icao: &str) -> Result<Option<BoundingBox>, OverpassError> {
        let response = self.query(&airport_bbox_query(icao), self.config.bbox_timeout())?;
        Ok(bbox_from_response(&response))
    }

    /// All gates, terminals, aprons and parking positions inside `bbox`
    pub fn get_airport_features(&self, bbox: &BoundingBox) -> Result<OverpassResponse, OverpassError> {
        self.query(&airport_features_query(bbox), self.config.features_timeout())
    }
}

pub fn airport_bbox_query(icao: &str) -> String {
    format!(
        r#"[out:json][timeout:30];
(
  way["aeroway"="aerodrome"]["icao"="{icao}"];
  relation["aeroway"="aerodrome"]["icao"="{icao}"];
);
out geom;"#
    )
}

pub fn airport_features_query(bbox: &BoundingBox) -> String {
    format!(
        r#"[out:json][timeout:60];
(
  node["aeroway"="gate"]({bbox});
  way["aeroway"="terminal"]({bbox});
  relation["aeroway"="terminal"]({bbox});
  way["aeroway"="apron"]({bbox});
  relation["aeroway"="apron"]({bbox});
  node["aeroway"="parking_position"]({bbox});
  way["aeroway"="parking_position"]({bbox});
);
out geom;"#
    )
}

/// Fold every way point and relation member point into a padded bounding box
pub fn bbox_from_response(response: &OverpassResponse) -> Option<BoundingBox> {
    if response.elements.is_empty() {
        return None;
    }

    let points = response.elements.iter().flat_map(|element| match element {
        Element::Way {
            geometry: Some(points),
            ..
        } => points.iter().collect::<Vec<_>>(),
        Element::Relation {
            members: Some(members),
            ..
        } => members
            .iter()
            .filter_map(|m| m.geometry.as_deref())
            .flatten()
            .collect(),
        _ => Vec::new(),
    });

    Extent::from_points(points.map(|p| (p.lat, p.lon)))
        .map(|extent| BoundingBox::buffered(&extent, AIRPORT_BBOX_BUFFER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overpass_response() {
        let json = r#"{
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 1, "lat": 40.64, "lon": -73.78, "tags": {"aeroway": "gate", "ref": "B22"}},
                {"type": "way", "id": 2, "nodes": [1, 3], "geometry": [{"lat": 1.0, "lon": 2.0}], "tags": {"aeroway": "apron", "surface": "concrete"}},
                {"type": "relation", "id": 3, "members": [{"type": "way", "ref": 9, "role": "outer", "geometry": [{"lat": 1.0, "lon": 2.0}]}]},
                {"type": "area", "id": 4}
            ]
        }"#;

        let response: OverpassResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.elements.len(), 4);
        assert_eq!(response.elements[0].kind(), "node");
        assert_eq!(response.elements[1].kind(), "way");
        assert_eq!(response.elements[2].kind(), "relation");
        assert!(matches!(response.elements[3], Element::Unknown));

        let gate_tags = response.elements[0].tags().unwrap();
        assert_eq!(gate_tags.aeroway.as_deref(), Some("gate"));
        assert_eq!(gate_tags.reference.as_deref(), Some("B22"));

        let apron_tags = response.elements[1].tags().unwrap();
        assert_eq!(apron_tags.other.get("surface").map(String::as_str), Some("concrete"));

        assert_eq!(response.elements[2].tags(), Some(&Tags::default()));
    }

    #[test]
    fn test_node_without_coordinates_rejected() {
        let json = r#"{"elements": [{"type": "node", "id": 1}]}"#;
        assert!(serde_json::from_str::<OverpassResponse>(json).is_err());
    }

    #[test]
    fn test_bbox_from_way_and_relation() {
        let json = r#"{"elements": [
            {"type": "way", "id": 1, "geometry": [{"lat": 10.0, "lon": 20.0}, {"lat": 10.5, "lon": 20.2}]},
            {"type": "relation", "id": 2, "members": [
                {"type": "way", "role": "outer", "geometry": [{"lat": 9.8, "lon": 20.9}]},
                {"type": "way", "role": "inner"}
            ]}
        ]}"#;
        let response: OverpassResponse = serde_json::from_str(json).unwrap();
        let bbox = bbox_from_response(&response).unwrap();

        assert!((bbox.south - (9.8 - 0.005)).abs() < 1e-9);
        assert!((bbox.west - (20.0 - 0.005)).abs() < 1e-9);
        assert!((bbox.north - (10.5 + 0.005)).abs() < 1e-9);
        assert!((bbox.east - (20.9 + 0.005)).abs() < 1e-9);
    }

    #[test]
    fn test_bbox_none_without_points() {
        assert!(bbox_from_response(&OverpassResponse::default()).is_none());

        let json = r#"{"elements": [
            {"type": "node", "id": 1, "lat": 1.0, "lon": 1.0},
            {"type": "way", "id": 2}
        ]}"#;
        let response: OverpassResponse = serde_json::from_str(json).unwrap();
        assert!(bbox_from_response(&response).is_none());
    }

    #[test]
    fn test_queries() {
        let q = airport_bbox_query("EGLL");
        assert!(q.starts_with("[out:json][timeout:30];"));
        assert!(q.contains(r#"way["aeroway"="aerodrome"]["icao"="EGLL"];"#));
        assert!(q.contains(r#"relation["aeroway"="aerodrome"]["icao"="EGLL"];"#));
        assert!(q.ends_with("out geom;"));

        let bbox = BoundingBox {
            south: 1.0,
            west: 2.0,
            north: 3.0,
            east: 4.0,
        };
        let q = airport_features_query(&bbox);
        assert!(q.starts_with("[out:json][timeout:60];"));
        assert!(q.contains(r#"node["aeroway"="gate"](1,2,3,4);"#));
        assert!(q.contains(r#"way["aeroway"="parking_position"](1,2,3,4);"#));
        assert_eq!(q.matches("(1,2,3,4)").count(), 7);
    }

    #[test]
    fn test_transient_classification() {
        assert!(OverpassError::Timeout.is_transient());
        assert!(OverpassError::Status { status: 429 }.is_transient());
        let decode = serde_json::from_str::<OverpassResponse>("nope").unwrap_err();
        assert!(!OverpassError::Decode(decode).is_transient());
    }
}
