// Report settings, loaded from an optional JSON file on top of the defaults.
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use shared::finnish_format;
use shared::models::LONG_RESERVATION_HOURS;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReportSettings {
    /// Overrides the header policy of reservation files. `None` keeps the schema default (no header).
    pub reservation_has_header: Option<bool>,
    /// Overrides the header policy of electricity logs. `None` keeps the schema default (header).
    pub energy_has_header: Option<bool>,
    pub long_reservation_hours: u32,
    /// Printed after every money amount in reservation reports.
    pub currency_symbol: String,
    /// Written by the weekly summary.
    pub summary_file: PathBuf,
    /// Written from the interactive menu.
    pub report_file: PathBuf,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            reservation_has_header: None,
            energy_has_header: None,
            long_reservation_hours: LONG_RESERVATION_HOURS,
            currency_symbol: finnish_format::EURO.to_string(),
            summary_file: PathBuf::from("summary.txt"),
            report_file: PathBuf::from("report.txt"),
        }
    }
}

impl ReportSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: ReportSettings = serde_json::from_str(json)
            .map_err(|e| EngineError::ConfigError(format!("invalid settings JSON: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            EngineError::ConfigError(format!("cannot read settings file '{}': {}", path.display(), e))
        })?;
        let settings = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), "Loaded report settings");
        Ok(settings)
    }

    /// Settings from `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.long_reservation_hours == 0 {
            return Err(EngineError::ConfigError(
                "long_reservation_hours must be greater than 0".to_string(),
            ));
        }
        if self.currency_symbol.trim().is_empty() {
            return Err(EngineError::ConfigError("currency_symbol must not be empty".to_string()));
        }
        if self.summary_file.as_os_str().is_empty() || self.report_file.as_os_str().is_empty() {
            return Err(EngineError::ConfigError("output file names must not be empty".to_string()));
        }
        Ok(())
    }
}
