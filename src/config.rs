//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `MARKET_SHARE_*` environment variables, then command line overrides applied
//! through the `with_*` builders.

use crate::app::services::entity::HomeBrandMatcher;
use crate::app::services::format_detector::{LayoutAColumns, LayoutBColumns};
use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_LOG_LEVEL, ENV_BRAND_NAME, ENV_LOG_LEVEL,
    ENV_WORKERS, HOME_BRAND_DISPLAY_NAME, MAX_BROKERAGES_EXPORT, MAX_BROKERAGES_PREVIEW,
};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Global configuration for market share processing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub processing: ProcessingConfig,
    pub home_brand: HomeBrandConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

/// Batch processing and column layout settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Number of files parsed concurrently
    pub workers: usize,

    /// Column positions for "Market Share ($)" exports
    pub layout_a: LayoutAColumns,

    /// Column positions for "Mkt %" exports
    pub layout_b: LayoutBColumns,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            layout_a: LayoutAColumns::default(),
            layout_b: LayoutBColumns::default(),
        }
    }
}

/// Home brand identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeBrandConfig {
    /// Name every matching alias is rewritten to
    pub display_name: String,

    /// Additional case-insensitive regex aliases, checked after the built-in ones
    pub extra_aliases: Vec<String>,
}

impl Default for HomeBrandConfig {
    fn default() -> Self {
        Self {
            display_name: HOME_BRAND_DISPLAY_NAME.to_string(),
            extra_aliases: Vec::new(),
        }
    }
}

/// Chart and export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Brokerages shown in a preview chart
    pub preview_chart_limit: usize,

    /// Brokerages shown in an exported chart
    pub export_chart_limit: usize,

    /// Prefix of the batch archive name
    pub archive_prefix: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            preview_chart_limit: MAX_BROKERAGES_PREVIEW,
            export_chart_limit: MAX_BROKERAGES_EXPORT,
            archive_prefix: crate::constants::ARCHIVE_NAME_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit file, or the user config file when present
    ///
    /// An explicit path must exist. The default location is optional and
    /// falls back to built-in defaults. Environment overrides are applied and
    /// the result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    debug!("No configuration file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// `<config dir>/market-share/config.toml`, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| Error::configuration(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text; missing sections take defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::configuration(e.to_string()))
    }

    /// Apply `MARKET_SHARE_*` overrides read through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_WORKERS) {
            self.processing.workers = value.trim().parse().map_err(|_| {
                Error::configuration(format!("{ENV_WORKERS} must be a whole number, got '{value}'"))
            })?;
            debug!("Worker count overridden from environment: {}", self.processing.workers);
        }

        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = value.trim().to_lowercase();
        }

        if let Some(value) = lookup(ENV_BRAND_NAME) {
            self.home_brand.display_name = value;
        }

        Ok(())
    }

    /// Check every setting, including that alias patterns compile
    pub fn validate(&self) -> Result<()> {
        if self.processing.workers == 0 {
            return Err(Error::configuration("workers must be at least 1"));
        }

        HomeBrandMatcher::new(&self.home_brand)?;
        self.processing.layout_a.validate()?;
        self.processing.layout_b.validate()?;

        if self.report.preview_chart_limit == 0 || self.report.export_chart_limit == 0 {
            return Err(Error::configuration("chart limits must be at least 1"));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(Error::configuration(format!(
                "unknown log level '{}', expected one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Override the worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.processing.workers = workers;
        self
    }

    /// Override the log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.level = level.into();
        self
    }

    /// Override the home brand display name
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.home_brand.display_name = display_name.into();
        self
    }

    /// Add a home brand alias pattern
    pub fn with_alias(mut self, pattern: impl Into<String>) -> Self {
        self.home_brand.extra_aliases.push(pattern.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.processing.workers >= 1);
        assert_eq!(config.report.preview_chart_limit, 15);
        assert_eq!(config.report.export_chart_limit, 10);
        assert_eq!(config.report.archive_prefix, "Market-Reports");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.home_brand.display_name, HOME_BRAND_DISPLAY_NAME);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [processing]
            workers = 3

            [home_brand]
            extra_aliases = ["desert\\s*luxe"]

            [processing.layout_b]
            avg_price = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.processing.workers, 3);
        assert_eq!(config.home_brand.extra_aliases, vec!["desert\\s*luxe"]);
        assert_eq!(config.home_brand.display_name, HOME_BRAND_DISPLAY_NAME);
        assert_eq!(config.processing.layout_b.market_percent, 8);
        assert_eq!(config.processing.layout_a.market_share_units, 12);
        config.validate().unwrap();
    }

    #[test]
    fn test_malformed_toml_is_configuration_error() {
        let err = Config::from_toml_str("[processing\nworkers = ").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env_overrides(env(&[
                (ENV_WORKERS, "6"),
                (ENV_LOG_LEVEL, " DEBUG "),
                (ENV_BRAND_NAME, "Home Realty"),
            ]))
            .unwrap();

        assert_eq!(config.processing.workers, 6);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.home_brand.display_name, "Home Realty");
        config.validate().unwrap();
    }

    #[test]
    fn test_bad_worker_env_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_env_overrides(env(&[(ENV_WORKERS, "many")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_WORKERS));
    }

    #[test]
    fn test_validation_failures() {
        assert!(Config::default().with_workers(0).validate().is_err());
        assert!(Config::default().with_display_name("  ").validate().is_err());
        assert!(Config::default().with_alias("(unclosed").validate().is_err());
        assert!(Config::default().with_log_level("loud").validate().is_err());

        let mut config = Config::default();
        config.report.export_chart_limit = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.processing.layout_b.market_percent = 9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[report]\npreview_chart_limit = 12\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.report.preview_chart_limit, 12);
        assert_eq!(config.report.export_chart_limit, 10);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
