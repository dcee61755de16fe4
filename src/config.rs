//! Dashboard configuration.
//!
//! Defaults cover the bundled layout (`data/csv{year}.csv`, 2020..=2023).
//! A JSON file named by `FLIGHTBOARD_CONFIG` can override any subset of
//! fields, and `FLIGHTBOARD_DATA_DIR` overrides the data directory last.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::DirectorySource;
use crate::data::season::Season;

pub const CONFIG_ENV: &str = "FLIGHTBOARD_CONFIG";
pub const DATA_DIR_ENV: &str = "FLIGHTBOARD_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory holding the per-year CSV files.
    pub data_dir: PathBuf,

    /// File name inside `data_dir`; `{year}` is replaced by the year.
    pub file_pattern: String,

    /// Years offered in the year selector.
    pub years: Vec<String>,

    /// Year loaded at startup.
    pub default_year: String,

    /// Entity selected when a dataset first loads (falls back to the first entity).
    pub default_entity: String,

    pub default_season: Season,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            file_pattern: "csv{year}.csv".to_string(),
            years: ["2020", "2021", "2022", "2023"].map(String::from).to_vec(),
            default_year: "2023".to_string(),
            default_entity: "Total Network Manager Area".to_string(),
            default_season: Season::All,
        }
    }
}

impl DashboardConfig {
    /// Defaults, then the optional config file, then the data-dir override.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }
        config.validate()?;
        Ok(config)
    }

    /// Read a (possibly partial) JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.years.is_empty() {
            bail!("config lists no years");
        }
        if !self.years.contains(&self.default_year) {
            bail!(
                "default year {} is not one of {:?}",
                self.default_year,
                self.years
            );
        }
        if !self.file_pattern.contains("{year}") {
            bail!("file pattern '{}' has no {{year}} placeholder", self.file_pattern);
        }
        Ok(())
    }

    pub fn is_supported_year(&self, year: &str) -> bool {
        self.years.iter().any(|y| y == year)
    }

    /// Directory-backed source for this configuration.
    pub fn source(&self) -> DirectorySource {
        DirectorySource::new(&self.data_dir, &self.file_pattern)
    }
}
