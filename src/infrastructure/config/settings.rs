//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings. The
//! feed API key is never read from the file; it comes from `ODDS_API_KEY`.
//!
//! # Example
//!
//! ```no_run
//! use sharpline::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::logging::LoggingConfig;
use crate::adapter::outbound::odds_api::{OddsApiConfig, DECIMAL_ODDS_FORMAT};
use crate::application::alert::AnalysisConfig;
use crate::application::scheduler::SchedulerConfig;
use crate::error::{ConfigError, Result};

/// Environment variable holding the feed API key.
pub const API_KEY_ENV: &str = "ODDS_API_KEY";

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database: String,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Upstream odds feed.
    #[serde(default)]
    pub feed: OddsApiConfig,

    /// Detector thresholds and sharp reference books.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Feed API key, from the environment only.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_database_path() -> String {
    "sharpline.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            logging: LoggingConfig::default(),
            feed: OddsApiConfig::default(),
            analysis: AnalysisConfig::default(),
            scheduler: SchedulerConfig::default(),
            api_key: None,
        }
    }
}

fn non_negative(field: &'static str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "must be 0 or greater".to_string(),
        }
        .into());
    }
    Ok(())
}

impl Config {
    /// Parse configuration from TOML content and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed,
    /// or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load from `path` when it exists, otherwise fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            return Self::load(path);
        }
        let mut config = Self::default();
        config.api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.database.is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        if self.feed.api_url.is_empty() {
            return Err(ConfigError::MissingField { field: "api_url" }.into());
        }
        if self.feed.odds_format != DECIMAL_ODDS_FORMAT {
            return Err(ConfigError::InvalidValue {
                field: "odds_format",
                reason: format!(
                    "only \"{DECIMAL_ODDS_FORMAT}\" odds are supported, got {:?}",
                    self.feed.odds_format
                ),
            }
            .into());
        }
        if self.feed.http.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        non_negative("min_profit_pct", self.analysis.min_profit_pct)?;
        non_negative("min_edge_pct", self.analysis.min_edge_pct)?;
        non_negative("min_movement_pct", self.analysis.min_movement_pct)?;
        if self.analysis.sharp_books.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sharp_books",
                reason: "must name at least one bookmaker".to_string(),
            }
            .into());
        }
        if self.analysis.sharp_books.iter().any(|b| b.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "sharp_books",
                reason: "bookmaker keys must not be blank".to_string(),
            }
            .into());
        }

        if self.scheduler.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "interval_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
