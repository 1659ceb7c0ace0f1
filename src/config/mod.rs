use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::RetryPolicy;

const CONFIG_NAME: &str = "aeroway-export";

fn default_verbose() -> bool {
    false
}

/// Settings read from `aeroway-export.toml`
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    #[serde(default)]
    pub overpass: Option<OverpassConfig>,
}

fn default_overpass_url() -> String {
    "https://overpass-api.de/api/interpreter".to_string()
}

fn default_bbox_timeout_secs() -> u64 {
    30
}

fn default_features_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_secs() -> u64 {
    5
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OverpassConfig {
    #[serde(default = "default_overpass_url")]
    pub url: String,
    /// Per-attempt timeout for the aerodrome lookup
    #[serde(default = "default_bbox_timeout_secs")]
    pub bbox_timeout_secs: u64,
    /// Per-attempt timeout for the feature query
    #[serde(default = "default_features_timeout_secs")]
    pub features_timeout_secs: u64,
    /// Total attempts, including the first one
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// First backoff delay, doubled after each failed attempt
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            url: default_overpass_url(),
            bbox_timeout_secs: default_bbox_timeout_secs(),
            features_timeout_secs: default_features_timeout_secs(),
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

impl OverpassConfig {
    pub fn bbox_timeout(&self) -> Duration {
        Duration::from_secs(self.bbox_timeout_secs)
    }

    pub fn features_timeout(&self) -> Duration {
        Duration::from_secs(self.features_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_secs(self.retry_delay_secs))
    }
}

/// Result of searching the config paths
#[derive(Debug, Default)]
pub struct LoadedConfig {
    pub config: Option<FileConfig>,
    /// Files that exist but failed to parse, with the parse error
    pub warnings: Vec<String>,
}

impl FileConfig {
    /// First config file found on the default search path that parses.
    /// Files that fail to parse are skipped and reported in `warnings`.
    pub fn load() -> LoadedConfig {
        Self::load_from(&get_config_paths())
    }

    pub fn load_from(paths: &[PathBuf]) -> LoadedConfig {
        let mut loaded = LoadedConfig::default();

        for path in paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => {
                        loaded.config = Some(config);
                        return loaded;
                    }
                    Err(e) => {
                        loaded
                            .warnings
                            .push(format!("Failed to parse config file {:?}: {}", path, e));
                    }
                }
            }
        }
        loaded
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from(format!("{}.toml", CONFIG_NAME)));
    paths.push(PathBuf::from(format!(".{}.toml", CONFIG_NAME)));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(CONFIG_NAME).join("config.toml"));
        paths.push(config_dir.join(format!("{}.toml", CONFIG_NAME)));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(format!(".{}.toml", CONFIG_NAME)));
    }

    paths
}
