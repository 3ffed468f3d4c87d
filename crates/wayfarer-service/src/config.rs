//! Configuration file parsing for the service.
//!
//! Loads storage location, actor queue size, matching thresholds and the
//! default log level from TOML. Every field has a default, so an empty file
//! (or no file) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use wayfarer_domain::MatchThresholds;

/// Service configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}

/// Top-level configuration
///
/// ```toml
/// log_level = "info"
///
/// [storage]
/// path = "wayfarer.db"
///
/// [service]
/// channel_capacity = 64
///
/// [matching]
/// corroborated_similarity = 0.8
/// uncorroborated_similarity = 0.9
/// max_distance_meters = 100.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WayfarerConfig {
    /// Where place data is persisted
    pub storage: StorageConfig,

    /// Store actor settings
    pub service: ServiceConfig,

    /// Identity resolution thresholds
    pub matching: MatchThresholds,

    /// Log filter used when `RUST_LOG` is not set
    /// Default: "info"
    pub log_level: LogLevel,
}

/// Storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database path; `:memory:` keeps nothing on disk
    /// Default: "wayfarer.db"
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("wayfarer.db"),
        }
    }
}

/// Store actor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Requests that may queue before senders wait
    /// Default: 64
    pub channel_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
        }
    }
}

/// Log filter directive, e.g. `"info"` or `"wayfarer_store=debug"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogLevel(pub String);

impl Default for LogLevel {
    fn default() -> Self {
        Self("info".to_string())
    }
}

impl WayfarerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: WayfarerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.matching;
        for (name, value) in [
            ("matching.corroborated_similarity", m.corroborated_similarity),
            ("matching.uncorroborated_similarity", m.uncorroborated_similarity),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be in (0, 1], got {}",
                    name, value
                )));
            }
        }

        if !(m.max_distance_meters > 0.0 && m.max_distance_meters.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "matching.max_distance_meters must be positive, got {}",
                m.max_distance_meters
            )));
        }

        if self.service.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "service.channel_capacity must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
