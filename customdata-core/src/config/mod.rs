//! Configuration management for customdata
//!
//! Settings come from defaults, a TOML file, or environment variables, and
//! are validated before use.

use crate::core_store::clock::TimestampFormat;
use crate::logging::{LogConfig, LogLevel};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

mod error;

pub use error::ConfigError;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Store configuration
    pub store: StoreConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Layout used when writing `_LAST_MODIFIED`
    pub timestamp_format: TimestampFormat,

    /// Whether new stores emit `Modified` events
    pub emit_modified: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatting
    pub json_format: bool,

    /// Include timestamps
    pub with_timestamp: bool,

    /// Include target module
    pub with_target: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            timestamp_format: TimestampFormat::Rfc3339,
            emit_modified: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_timestamp: true,
            with_target: true,
        }
    }
}

impl LoggingConfig {
    /// Convert into the logging subsystem's own config
    pub fn to_log_config(&self) -> Result<LogConfig, ConfigError> {
        let level: LogLevel = self.level.parse().map_err(|_| {
            ConfigError::ValidationFailed(format!("Invalid log level: {}", self.level))
        })?;

        Ok(LogConfig::new(level)
            .with_timestamp(self.with_timestamp)
            .with_target(self.with_target)
            .json_format(self.json_format))
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Recognised variables:
    /// - CUSTOMDATA_TIMESTAMP_FORMAT (rfc3339 | text_date)
    /// - CUSTOMDATA_EMIT_MODIFIED (true | false)
    /// - CUSTOMDATA_LOG_LEVEL
    /// - CUSTOMDATA_LOG_JSON (true | false)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(format) = lookup("CUSTOMDATA_TIMESTAMP_FORMAT") {
            config.store.timestamp_format = format.parse::<TimestampFormat>().map_err(|reason| {
                ConfigError::InvalidEnvValue { var: "CUSTOMDATA_TIMESTAMP_FORMAT", reason }
            })?;
        }
        if let Some(emit) = lookup("CUSTOMDATA_EMIT_MODIFIED") {
            config.store.emit_modified = parse_bool("CUSTOMDATA_EMIT_MODIFIED", &emit)?;
        }

        if let Some(level) = lookup("CUSTOMDATA_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(json) = lookup("CUSTOMDATA_LOG_JSON") {
            config.logging.json_format = parse_bool("CUSTOMDATA_LOG_JSON", &json)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging.to_log_config()?;
        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::write(path, contents).map_err(|e| ConfigError::FileWrite {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(())
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|e: std::str::ParseBoolError| ConfigError::InvalidEnvValue {
            var,
            reason: e.to_string(),
        })
}
