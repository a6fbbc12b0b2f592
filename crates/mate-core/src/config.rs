//! Insights configuration
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/mate/config/insights.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Only tunables live here. The fixed heuristic constants of each analyzer
//! are not configurable.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::insights::Sensitivity;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/insights.toml");

/// Tunables for the insights pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct InsightsConfig {
    /// Default anomaly sensitivity when a request doesn't specify one
    pub sensitivity: Sensitivity,
    /// Exponential smoothing factor
    pub smoothing_alpha: f64,
    /// Forecast horizon for both forecasters
    pub forecast_periods: usize,
    /// Months of history used for category trends
    pub trend_months: usize,
    /// Append the fixed placeholder recommendations
    pub include_placeholder_recommendations: bool,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            sensitivity: Sensitivity::Medium,
            smoothing_alpha: 0.3,
            forecast_periods: 3,
            trend_months: 3,
            include_placeholder_recommendations: true,
        }
    }
}

impl InsightsConfig {
    /// Load from the override location, falling back to embedded defaults
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => parse_config(DEFAULT_CONFIG),
        }
    }

    /// Load from an explicit file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::InvalidData(format!("Failed to read config: {}", e)))?;
        parse_config(&content)
    }

    /// Load from `path` if given, otherwise use [`InsightsConfig::load`]
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("mate").join("config").join("insights.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    anomaly: Option<RawAnomaly>,
    forecast: Option<RawForecast>,
    budget: Option<RawBudget>,
    recommendations: Option<RawRecommendations>,
}

#[derive(Debug, Deserialize)]
struct RawAnomaly {
    sensitivity: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    alpha: Option<f64>,
    periods: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawBudget {
    trend_months: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawRecommendations {
    include_placeholders: Option<bool>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<InsightsConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::InvalidData(format!("Invalid config TOML: {}", e)))?;

    let mut config = InsightsConfig::default();

    if let Some(anomaly) = raw.anomaly {
        if let Some(sensitivity) = anomaly.sensitivity {
            config.sensitivity = sensitivity.parse().map_err(Error::InvalidData)?;
        }
    }

    if let Some(forecast) = raw.forecast {
        if let Some(alpha) = forecast.alpha {
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(Error::InvalidData(format!(
                    "forecast.alpha must be in (0, 1], got {}",
                    alpha
                )));
            }
            config.smoothing_alpha = alpha;
        }
        if let Some(periods) = forecast.periods {
            config.forecast_periods = periods;
        }
    }

    if let Some(budget) = raw.budget {
        if let Some(months) = budget.trend_months {
            if months < 2 {
                return Err(Error::InvalidData(format!(
                    "budget.trend_months must be at least 2, got {}",
                    months
                )));
            }
            config.trend_months = months;
        }
    }

    if let Some(recs) = raw.recommendations {
        if let Some(include) = recs.include_placeholders {
            config.include_placeholder_recommendations = include;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, InsightsConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = parse_config(
            r#"
            [anomaly]
            sensitivity = "high"

            [recommendations]
            include_placeholders = false
            "#,
        )
        .unwrap();

        assert_eq!(config.sensitivity, Sensitivity::High);
        assert!(!config.include_placeholder_recommendations);
        assert_eq!(config.forecast_periods, 3);
        assert_eq!(config.smoothing_alpha, 0.3);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(parse_config("[forecast]\nalpha = 0.0").is_err());
        assert!(parse_config("[forecast]\nalpha = 1.5").is_err());
        assert!(parse_config("[budget]\ntrend_months = 1").is_err());
        assert!(parse_config("[anomaly]\nsensitivity = \"extreme\"").is_err());
        assert!(parse_config("not toml at all [").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("insights.toml");
        fs::write(&path, "[forecast]\nperiods = 6\n").unwrap();

        let config = InsightsConfig::resolve(Some(&path)).unwrap();
        assert_eq!(config.forecast_periods, 6);

        let missing = dir.path().join("missing.toml");
        assert!(InsightsConfig::from_file(&missing).is_err());
    }
}
