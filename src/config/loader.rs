//! Configuration loading
//!
//! The persisted area selection is an integer-encoded bit mask; loading
//! truncates unknown bits and applies the standby-list supersession rule so
//! the engine only ever sees a normalized mask.

use super::defaults::{
    default_areas, default_exclusions, default_log_level, default_max_threads,
};
use crate::core::types::MemoryArea;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub optimization: OptimizationConfig,

    #[serde(default)]
    pub process_trim: ProcessTrimConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Area selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationConfig {
    /// Integer-encoded MemoryArea bit mask
    #[serde(default = "default_areas")]
    pub areas: u32,
}

/// Per-process working-set trim settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessTrimConfig {
    #[serde(default = "default_max_threads")]
    pub max_threads: usize,
    /// Process image names never trimmed
    #[serde(default = "default_exclusions")]
    pub exclusions: Vec<String>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        OptimizationConfig {
            areas: default_areas(),
        }
    }
}

impl Default for ProcessTrimConfig {
    fn default() -> Self {
        ProcessTrimConfig {
            max_threads: default_max_threads(),
            exclusions: default_exclusions(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            optimization: OptimizationConfig::default(),
            process_trim: ProcessTrimConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// The persisted mask as a normalized `MemoryArea`: unknown bits are
    /// truncated and the supersession rule applied.
    pub fn areas(&self) -> MemoryArea {
        MemoryArea::from_bits_truncate(self.optimization.areas).normalize()
    }
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Loads configuration from file
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Loads configuration or returns defaults if the file doesn't exist
    pub fn load_or_default(&self) -> Config {
        self.load().unwrap_or_default()
    }

    /// Saves configuration to file
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Loads configuration from the default location
pub fn load_config() -> Result<Config, ConfigError> {
    Ok(ConfigLoader::new("memsweep.toml").load_or_default())
}
