//! Configuration validation

use super::loader::{Config, ConfigError};
use crate::core::types::MemoryArea;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_areas(config)?;
        Self::validate_trim(config)?;
        Self::validate_logging(config)?;
        Ok(())
    }

    fn validate_areas(config: &Config) -> Result<(), ConfigError> {
        let raw = config.optimization.areas;
        if raw != 0 && MemoryArea::from_bits_truncate(raw).is_empty() {
            return Err(ConfigError::Invalid(format!(
                "area mask {:#x} has no known area bits",
                raw
            )));
        }
        Ok(())
    }

    fn validate_trim(config: &Config) -> Result<(), ConfigError> {
        if config.process_trim.max_threads == 0 {
            return Err(ConfigError::Invalid(
                "process_trim.max_threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_logging(config: &Config) -> Result<(), ConfigError> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "unknown log level '{}'",
                config.logging.level
            )));
        }
        Ok(())
    }
}

/// Validate a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}
