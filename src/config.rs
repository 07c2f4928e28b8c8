use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level TTT configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TttConfig {
    /// Seed for the noise baseline column.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Whether the dataset gets a `rand_var` noise column.
    #[serde(default = "default_true")]
    pub noise_column: bool,

    /// OLR input.
    pub olr: OlrToml,

    /// Event detection settings.
    #[serde(default)]
    pub events: EventsToml,

    /// Output file locations.
    #[serde(default)]
    pub output: OutputToml,

    /// MJO index input, required by `ttt dataset`.
    #[serde(default)]
    pub mjo: Option<MjoToml>,

    /// Predictor variables, one column each.
    #[serde(default)]
    pub predictors: Vec<PredictorToml>,
}

impl TttConfig {
    /// Reads and parses a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OlrToml {
    pub path: PathBuf,
    #[serde(default = "default_olr_var")]
    pub var: String,
    /// Precomputed 365-day long-term mean; built from `path` when absent.
    #[serde(default)]
    pub climatology_path: Option<PathBuf>,
    /// `[west, south, east, north]` region read from the file.
    #[serde(default)]
    pub crop: Option<[f64; 4]>,
}

fn default_olr_var() -> String {
    "olr".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventsToml {
    #[serde(default = "default_threshold_sd")]
    pub threshold_sd: f64,
    #[serde(default = "default_half_window")]
    pub half_window: usize,
}

impl Default for EventsToml {
    fn default() -> Self {
        Self {
            threshold_sd: default_threshold_sd(),
            half_window: default_half_window(),
        }
    }
}

fn default_threshold_sd() -> f64 {
    2.0
}
fn default_half_window() -> usize {
    5
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputToml {
    #[serde(default = "default_index_csv")]
    pub index_csv: PathBuf,
    #[serde(default = "default_dataset_csv")]
    pub dataset_csv: PathBuf,
}

impl Default for OutputToml {
    fn default() -> Self {
        Self {
            index_csv: default_index_csv(),
            dataset_csv: default_dataset_csv(),
        }
    }
}

fn default_index_csv() -> PathBuf {
    PathBuf::from("TTT_Index.csv")
}
fn default_dataset_csv() -> PathBuf {
    PathBuf::from("TTT_DATA.csv")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MjoToml {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictorToml {
    /// Column name in the dataset.
    pub name: String,
    pub path: PathBuf,
    pub var: String,
    /// `[west, south, east, north]` box averaged into the column.
    #[serde(rename = "box")]
    pub bbox: [f64; 4],
    /// Build the climatology and anomalies from Oct-May days only.
    #[serde(default = "default_true")]
    pub season_only: bool,
}
