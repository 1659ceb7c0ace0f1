//! aeroway-export - Export OpenStreetMap airport infrastructure as GeoJSON

pub mod api;
pub mod config;
pub mod domain;
pub mod export;
pub mod geometry;
pub mod logging;
pub mod osm;
pub mod pipeline;

pub use api::{OverpassClient, OverpassError};
pub use config::{FileConfig, OverpassConfig};
pub use pipeline::{export_airport_data, extract_airport_data, run};
