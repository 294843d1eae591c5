//! Configuration for the optimization engine
//!
//! Persists the selected area mask plus trim and logging settings as TOML.

mod defaults;
mod loader;
mod validator;

pub use loader::{load_config, Config, ConfigError, ConfigLoader};
pub use loader::{LoggingConfig, OptimizationConfig, ProcessTrimConfig};
pub use validator::{validate_config, ConfigValidator};

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_module_exports() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());

        let result: ConfigResult<String> = Ok("test".to_string());
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_config_export() {
        // Returns defaults when the file doesn't exist
        let result = load_config();
        assert!(result.is_ok());
    }
}
