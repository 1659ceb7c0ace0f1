use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use aeroway_export::config::{FileConfig, OverpassConfig};
use aeroway_export::{OverpassClient, logging, run};

/// Export OpenStreetMap airport gates, terminals, aprons and parking stands as GeoJSON
///
/// Examples:
///   # Export JFK into ./exports/KJFK/ next to the binary
///   aeroway-export KJFK
///
///   # Export Heathrow somewhere else
///   aeroway-export egll -o /tmp/airports
///
///   # Use a local Overpass instance
///   aeroway-export LFPG --endpoint http://localhost:12345/api/interpreter
#[derive(Parser, Debug)]
#[command(name = "aeroway-export")]
#[command(version, about, long_about = None)]
struct Args {
    /// Airport ICAO code (e.g., KJFK, EGLL)
    icao: String,

    /// Output directory (defaults to `exports` next to the executable)
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Path to config file (optional, auto-searches aeroway-export.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overpass interpreter URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let total_start = Instant::now();

    let (file_config, config_warnings) = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            let config: FileConfig =
                toml::from_str(&contents).context("Failed to parse config file")?;
            (Some(config), Vec::new())
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        let loaded = FileConfig::load();
        (loaded.config, loaded.warnings)
    };

    let verbose = args.verbose || file_config.as_ref().map(|c| c.verbose).unwrap_or(false);
    let spinner = create_spinner();
    logging::init(verbose, &spinner).context("Failed to set up logging")?;

    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    let mut overpass_config: OverpassConfig = file_config
        .as_ref()
        .and_then(|c| c.overpass.clone())
        .unwrap_or_default();
    if let Some(endpoint) = args.endpoint.clone() {
        overpass_config.url = endpoint;
    }

    let output_root = args
        .output_dir
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.output_dir.clone()))
        .unwrap_or_else(default_export_dir);

    let icao = args.icao.to_uppercase();

    tracing::debug!("Overpass endpoint: {}", overpass_config.url);
    tracing::debug!("Output directory: {}", output_root.display());

    let client =
        OverpassClient::from_config(overpass_config).context("Failed to create Overpass client")?;

    spinner.set_message(format!("Exporting airport {}...", icao));
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    let result = run(&client, &icao, &output_root);
    spinner.finish_and_clear();

    let Some(summary) = result? else {
        return Ok(ExitCode::from(1));
    };

    if let Some(combined) = summary.combined {
        tracing::info!(
            "Done! {} [{:.1}s]",
            combined.path.display(),
            total_start.elapsed().as_secs_f32()
        );
    }

    Ok(ExitCode::SUCCESS)
}

fn default_export_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("exports")))
        .unwrap_or_else(|| PathBuf::from("exports"))
}

fn create_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
    pb.set_style(style);
    pb
}
