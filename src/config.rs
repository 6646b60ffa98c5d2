use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::filter::DateRange;
use crate::data::loader::LoadOptions;

/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV: &str = "UPWELLING_DASHBOARD_CONFIG";

/// Config file looked up in the working directory when the variable is unset.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

/// One input file and how to read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub path: PathBuf,
    #[serde(flatten)]
    pub options: LoadOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Historical indicators with the observed upwelling status (Home page).
    pub historical: DatasetConfig,
    /// SVARMA / VAR forecast output (Forecast page).
    pub forecast: DatasetConfig,
    /// Table used to auto-fill the Prediction page.
    pub prediction_source: DatasetConfig,
    /// Serialized classifier artifact.
    pub model_path: PathBuf,
    /// Dates the Forecast page lets the user pick from.
    pub forecast_start: NaiveDate,
    pub forecast_end: NaiveDate,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            historical: DatasetConfig {
                path: PathBuf::from("data/historical.csv"),
                options: LoadOptions {
                    status_column: Some("Status".to_string()),
                    ..LoadOptions::default()
                },
            },
            forecast: DatasetConfig {
                path: PathBuf::from("data/forecast.csv"),
                options: LoadOptions {
                    delimiter: ';',
                    ..LoadOptions::default()
                },
            },
            prediction_source: DatasetConfig {
                path: PathBuf::from("data/data.csv"),
                options: LoadOptions::default(),
            },
            model_path: PathBuf::from("data/model.json"),
            forecast_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            forecast_end: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or_default(),
        }
    }
}

impl DashboardConfig {
    pub fn forecast_window(&self) -> DateRange {
        DateRange(self.forecast_start, self.forecast_end)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Parse a config file laid over [`DashboardConfig::default`]. A dataset
    /// entry keeps its own defaults for every option it does not name.
    pub fn from_json(text: &str) -> Result<Self> {
        let overrides: Value = serde_json::from_str(text)?;
        let mut merged = serde_json::to_value(Self::default())?;
        overlay(&mut merged, overrides);
        let config: DashboardConfig = serde_json::from_value(merged)?;
        if config.forecast_start > config.forecast_end {
            anyhow::bail!(
                "forecast_start {} is after forecast_end {}",
                config.forecast_start,
                config.forecast_end
            );
        }
        Ok(config)
    }

    /// Load the config named by [`CONFIG_ENV`] or [`DEFAULT_CONFIG_FILE`].
    ///
    /// Never fails: a missing file means defaults, a broken one is logged
    /// and replaced by defaults.
    pub fn load() -> Self {
        let (path, explicit) = match std::env::var_os(CONFIG_ENV) {
            Some(p) => (PathBuf::from(p), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !explicit && !path.exists() {
            log::info!("No {DEFAULT_CONFIG_FILE} found, using default configuration");
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::error!("Invalid configuration, using defaults: {e:#}");
                Self::default()
            }
        }
    }
}

/// Objects merge key by key; any other value replaces what is there.
fn overlay(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}
