//! Application configuration loaded from `estimator.toml`.
//!
//! Every key has a default, so an empty or missing file is a valid
//! configuration.
//!
//! ```toml
//! [database]
//! backend = "sqlite"
//! connection_string = "estimator.db"
//!
//! [gesture]
//! swipe_threshold = 50.0
//! cell_width = 8.0
//! cell_height = 16.0
//!
//! [display]
//! currency_symbol = "$"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use estimator_core::db::DbConfig;
use estimator_core::gesture::DEFAULT_SWIPE_THRESHOLD;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DbConfig,
    pub gesture: GestureConfig,
    pub display: DisplayConfig,
}

/// Swipe recognition in the terminal.
///
/// Mouse positions arrive in character cells; each cell is scaled by
/// `cell_width` x `cell_height` before it reaches the swipe tracker, so
/// `swipe_threshold` keeps its touch-screen meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub swipe_threshold: f64,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            cell_width: 8.0,
            cell_height: 16.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub currency_symbol: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse configuration TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration in {:?}", path.as_ref()))
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            info!(path = ?path.as_ref(), "loading configuration");
            Self::load_from_file(path)
        } else {
            info!(path = ?path.as_ref(), "no configuration file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.backend.trim().is_empty() {
            anyhow::bail!("database.backend must not be empty");
        }
        if self.database.connection_string.trim().is_empty() {
            anyhow::bail!("database.connection_string must not be empty");
        }

        for (key, value) in [
            ("gesture.swipe_threshold", self.gesture.swipe_threshold),
            ("gesture.cell_width", self.gesture.cell_width),
            ("gesture.cell_height", self.gesture.cell_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                anyhow::bail!("{key} must be a positive number, got {value}");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.database, DbConfig::default());
        assert_eq!(config.gesture.swipe_threshold, 50.0);
        assert_eq!(config.display.currency_symbol, "$");
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [database]
            connection_string = ":memory:"

            [gesture]
            swipe_threshold = 80.0
            "#,
        )
        .unwrap();

        assert_eq!(config.database, DbConfig::new("sqlite", ":memory:"));
        assert_eq!(config.gesture.swipe_threshold, 80.0);
        assert_eq!(config.gesture.cell_width, 8.0);
        assert_eq!(config.gesture.cell_height, 16.0);
    }

    #[test]
    fn currency_symbol_is_configurable() {
        let config = AppConfig::from_toml_str("[display]\ncurrency_symbol = \"€\"").unwrap();

        assert_eq!(config.display.currency_symbol, "€");
    }

    #[test]
    fn rejects_non_positive_threshold() {
        let err = AppConfig::from_toml_str("[gesture]\nswipe_threshold = 0.0").unwrap_err();

        assert!(
            format!("{err:#}").contains("gesture.swipe_threshold"),
            "unexpected error: {err:#}"
        );
    }

    #[test]
    fn rejects_empty_backend() {
        let err = AppConfig::from_toml_str("[database]\nbackend = \"\"").unwrap_err();

        assert!(format!("{err:#}").contains("database.backend"));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(AppConfig::from_toml_str("[gesture\nswipe_threshold = 1").is_err());
    }

    #[test]
    fn load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();

        let config = AppConfig::load_or_default(dir.path().join("missing.toml")).unwrap();

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn load_from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("estimator.toml");
        std::fs::write(&path, "[database]\nbackend = \"sqlite\"\nconnection_string = \"quotes.db\"\n")
            .unwrap();

        let config = AppConfig::load_or_default(&path).unwrap();

        assert_eq!(config.database.connection_string, "quotes.db");
    }
}
