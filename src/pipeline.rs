use anyhow::{Context, Result};
use std::path::Path;

use crate::api::{OverpassClient, OverpassTransport};
use crate::export::{ExportSummary, write_airport_data};
use crate::osm::{CategorizedCollections, build_categorized_geojson};

/// Look up an airport and group its features by bucket.
///
/// Returns `Ok(None)` when no aerodrome is tagged with `icao`.
pub fn extract_airport_data<T: OverpassTransport>(
    client: &OverpassClient<T>,
    icao: &str,
) -> Result<Option<CategorizedCollections>> {
    let icao = icao.to_uppercase();

    tracing::info!("Looking up airport {}...", icao);
    let bbox = client
        .get_airport_bbox(&icao)
        .with_context(|| format!("Failed to look up airport {}", icao))?;

    let Some(bbox) = bbox else {
        return Ok(None);
    };

    tracing::info!("Found airport, querying features...");
    tracing::debug!("Bounding box: {}", bbox);
    let response = client
        .get_airport_features(&bbox)
        .context("Failed to fetch airport features from Overpass API")?;
    tracing::info!("Found {} features", response.elements.len());

    Ok(Some(build_categorized_geojson(&response.elements, &icao)))
}

/// Write categorized features to `{output_root}/{ICAO}/`
pub fn export_airport_data(
    categorized: &CategorizedCollections,
    icao: &str,
    output_root: &Path,
) -> Result<ExportSummary> {
    let icao = icao.to_uppercase();
    let output_dir = output_root.join(&icao);
    write_airport_data(categorized, &icao, &output_dir)
}

/// Extract and export in one go. Returns `Ok(None)` without touching the
/// filesystem when the airport is not found.
pub fn run<T: OverpassTransport>(
    client: &OverpassClient<T>,
    icao: &str,
    output_root: &Path,
) -> Result<Option<ExportSummary>> {
    let Some(categorized) = extract_airport_data(client, icao)? else {
        tracing::error!("Airport {} not found in OpenStreetMap", icao.to_uppercase());
        return Ok(None);
    };

    export_airport_data(&categorized, icao, output_root)
        .context("Failed to write GeoJSON files")
        .map(Some)
}
