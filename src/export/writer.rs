use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::domain::AirportCollection;
use crate::osm::CategorizedCollections;

/// A file written by the exporter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub features: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Per-bucket files, in bucket order
    pub categories: Vec<WrittenFile>,
    pub combined: Option<WrittenFile>,
}

/// Write one pretty-printed file per bucket plus a compact `{icao}.geojson`
/// holding every feature.
///
/// # Arguments
/// * `categorized` - Bucketed collections
/// * `icao` - Airport code, names the combined collection and file
/// * `output_dir` - Created if missing
pub fn write_airport_data(
    categorized: &CategorizedCollections,
    icao: &str,
    output_dir: &Path,
) -> Result<ExportSummary> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let mut summary = ExportSummary::default();

    for (bucket, collection) in categorized.iter() {
        let path = output_dir.join(format!("{}.geojson", bucket));
        write_collection(&path, collection, true)?;
        tracing::info!("Wrote {} features to {}", collection.len(), path.display());
        summary.categories.push(WrittenFile {
            path,
            features: collection.len(),
        });
    }

    let combined = categorized.combined(icao);
    let path = output_dir.join(format!("{}.geojson", icao));
    write_collection(&path, &combined, false)?;
    tracing::info!("Wrote {} features to {}", combined.len(), path.display());
    summary.combined = Some(WrittenFile {
        path,
        features: combined.len(),
    });

    Ok(summary)
}

fn write_collection(path: &Path, collection: &AirportCollection, pretty: bool) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create GeoJSON file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let geojson = collection.to_geojson();

    let written = if pretty {
        serde_json::to_writer_pretty(&mut writer, &geojson)
    } else {
        serde_json::to_writer(&mut writer, &geojson)
    };
    written.with_context(|| format!("Failed to write GeoJSON file: {}", path.display()))?;

    writer
        .flush()
        .with_context(|| format!("Failed to flush GeoJSON file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OverpassResponse;
    use crate::osm::build_categorized_geojson;
    use tempfile::tempdir;

    fn sample() -> CategorizedCollections {
        let response: OverpassResponse = serde_json::from_str(
            r#"{"elements": [
                {"type": "node", "id": 1, "lat": 10.0, "lon": 20.0, "tags": {"aeroway": "gate", "ref": "A1"}},
                {"type": "node", "id": 2, "lat": 10.1, "lon": 20.1, "tags": {"aeroway": "parking_position"}}
            ]}"#,
        )
        .unwrap();
        build_categorized_geojson(&response.elements, "KSFO")
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_write_airport_data() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested").join("KSFO");

        let summary = write_airport_data(&sample(), "KSFO", &out).unwrap();

        let names: Vec<_> = summary
            .categories
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "gates.geojson",
                "terminals.geojson",
                "aprons.geojson",
                "parking_stands.geojson"
            ]
        );
        let counts: Vec<_> = summary.categories.iter().map(|f| f.features).collect();
        assert_eq!(counts, vec![1, 0, 0, 1]);

        let combined = summary.combined.unwrap();
        assert_eq!(combined.path, out.join("KSFO.geojson"));
        assert_eq!(combined.features, 2);

        let gates = read_json(&out.join("gates.geojson"));
        assert_eq!(gates["name"], "KSFO_gates");
        assert_eq!(gates["features"][0]["properties"]["ref"], "A1");

        let all = read_json(&out.join("KSFO.geojson"));
        assert_eq!(all["name"], "KSFO");
        assert_eq!(all["features"].as_array().unwrap().len(), 2);
        assert_eq!(all["features"][1]["properties"]["category"], "parking_stand");
    }

    #[test]
    fn test_pretty_and_compact_formatting() {
        let dir = tempdir().unwrap();
        write_airport_data(&sample(), "KSFO", dir.path()).unwrap();

        let pretty = fs::read_to_string(dir.path().join("gates.geojson")).unwrap();
        assert!(pretty.contains("\n  \""));

        let compact = fs::read_to_string(dir.path().join("KSFO.geojson")).unwrap();
        assert!(!compact.contains('\n'));
    }

    #[test]
    fn test_existing_directory_is_reused() {
        let dir = tempdir().unwrap();
        write_airport_data(&sample(), "KSFO", dir.path()).unwrap();
        let summary = write_airport_data(&sample(), "KSFO", dir.path()).unwrap();
        assert_eq!(summary.combined.unwrap().features, 2);
    }
}
