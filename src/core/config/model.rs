//! Classifier artifact configuration.

use super::errors::{ConfigError, ConfigValidator};
use super::onnx::OrtSessionConfig;
use crate::core::constants::DEFAULT_MODEL_PATH;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the classifier lives and how its ONNX Runtime sessions are built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the ONNX model file.
    pub model_path: PathBuf,
    /// Display name; defaults to the file stem of `model_path`.
    pub model_name: Option<String>,
    /// Input tensor name; discovered from the session when absent.
    pub input_name: Option<String>,
    /// Output tensor name; discovered from the session when absent.
    pub output_name: Option<String>,
    /// Number of sessions to keep for concurrent requests.
    pub session_pool_size: usize,
    /// ONNX Runtime session options.
    pub ort_session: Option<OrtSessionConfig>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            model_name: None,
            input_name: None,
            output_name: None,
            session_pool_size: 1,
            ort_session: None,
        }
    }
}

impl ModelConfig {
    /// Creates a configuration for the model at `model_path`.
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            ..Self::default()
        }
    }

    /// Sets the session pool size.
    pub fn session_pool_size(mut self, size: usize) -> Self {
        self.session_pool_size = size;
        self
    }

    /// Sets the ONNX Runtime session options.
    pub fn ort_session(mut self, config: OrtSessionConfig) -> Self {
        self.ort_session = Some(config);
        self
    }

    /// Returns the configured name, or the model file stem.
    pub fn resolved_model_name(&self) -> String {
        self.model_name
            .clone()
            .or_else(|| {
                self.model_path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "unknown_model".to_string())
    }
}

impl ConfigValidator for ModelConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_positive_usize(self.session_pool_size, "session_pool_size")?;
        self.validate_model_path(&self.model_path)
    }
}
