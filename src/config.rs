//! Analysis parameters: which countries, which year window, how far to
//! extrapolate. Passed explicitly into the pipeline; the only process-wide
//! state this crate touches is the logger in the CLI binary.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default forecast horizon in years.
pub const DEFAULT_FORECAST_YEARS: u32 = 5;

/// Parameters for one analysis run.
///
/// Serialized as `user_config.json` so a run's parameters can be reused;
/// fields missing from the file fall back to the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    #[serde(default = "default_countries")]
    pub countries: Vec<String>,
    #[serde(default = "default_start_year")]
    pub start_year: i32,
    #[serde(default = "default_end_year")]
    pub end_year: i32,
    #[serde(default = "default_forecast_years")]
    pub forecast_years: u32,
}

fn default_countries() -> Vec<String> {
    ["Ukraine", "Poland", "Germany", "France", "United Kingdom"]
        .map(String::from)
        .to_vec()
}

fn default_start_year() -> i32 {
    1960
}

fn default_end_year() -> i32 {
    2018
}

fn default_forecast_years() -> u32 {
    DEFAULT_FORECAST_YEARS
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            countries: default_countries(),
            start_year: default_start_year(),
            end_year: default_end_year(),
            forecast_years: default_forecast_years(),
        }
    }
}

impl AnalysisConfig {
    /// Load from a JSON file, falling back to defaults if the file is absent.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parse config {}", path.display()))
    }

    /// Save as pretty JSON for future runs.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), text)
            .with_context(|| format!("write config {}", path.as_ref().display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_and_partial_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("user_config.json");

        let cfg = AnalysisConfig {
            countries: vec!["Ukraine".into()],
            ..Default::default()
        };
        cfg.save(&path).unwrap();
        assert_eq!(AnalysisConfig::load_or_default(&path).unwrap(), cfg);

        // Partial file: missing fields take defaults.
        std::fs::write(&path, r#"{"start_year": 1990}"#).unwrap();
        let loaded = AnalysisConfig::load_or_default(&path).unwrap();
        assert_eq!(loaded.start_year, 1990);
        assert_eq!(loaded.end_year, 2018);
        assert_eq!(loaded.forecast_years, DEFAULT_FORECAST_YEARS);
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempdir().unwrap();
        let loaded = AnalysisConfig::load_or_default(dir.path().join("nope.json")).unwrap();
        assert_eq!(loaded, AnalysisConfig::default());
    }
}
