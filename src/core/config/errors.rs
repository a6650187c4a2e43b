//! Configuration error types and validation traits.

use crate::core::errors::DigitError;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A model path does not exist.
    #[error("model path does not exist: {path}")]
    ModelPathNotFound { path: std::path::PathBuf },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A configuration file could not be read or parsed.
    #[error("failed to load configuration from '{path}': {message}")]
    LoadFailed { path: std::path::PathBuf, message: String },
}

impl From<ConfigError> for DigitError {
    fn from(err: ConfigError) -> Self {
        DigitError::config_error(err.to_string())
    }
}

/// A trait for validating configuration parameters.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Validates that a model path exists and is a file.
    fn validate_model_path(&self, path: &Path) -> Result<(), ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::ModelPathNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Validates that a count is greater than zero.
    fn validate_positive_usize(&self, value: usize, field: &str) -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::InvalidConfig {
                message: format!("{field} must be greater than 0"),
            });
        }
        Ok(())
    }

    /// Validates that a float is finite and strictly positive.
    fn validate_positive_f32(&self, value: f32, field: &str) -> Result<(), ConfigError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::InvalidConfig {
                message: format!("{field} must be a finite value greater than 0, got {value}"),
            });
        }
        Ok(())
    }
}
