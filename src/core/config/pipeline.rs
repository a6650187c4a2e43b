//! Normalizer and pipeline configuration, and the JSON file that carries them.

use super::errors::{ConfigError, ConfigValidator};
use super::model::ModelConfig;
use crate::core::constants::{CANONICAL_SIZE, DEFAULT_EMPTY_INPUT_THRESHOLD};
use crate::processors::types::ResampleFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for the image normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Filter used to resample to the canonical resolution.
    pub resample_filter: ResampleFilter,
    /// Side length of the canonical image.
    pub canonical_size: u32,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            resample_filter: ResampleFilter::default(),
            canonical_size: CANONICAL_SIZE,
        }
    }
}

impl ConfigValidator for NormalizerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.canonical_size != CANONICAL_SIZE {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "canonical_size must be {CANONICAL_SIZE} to match the classifier input, got {}",
                    self.canonical_size
                ),
            });
        }
        Ok(())
    }
}

/// Settings for the shared decode/normalize/infer pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Normalizer settings.
    pub normalizer: NormalizerConfig,
    /// Tensor sum at or below which input counts as empty (when the check is enabled).
    pub empty_input_threshold: f32,
    /// Directory for debug images of each request; disabled when absent.
    pub debug_dump_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig::default(),
            empty_input_threshold: DEFAULT_EMPTY_INPUT_THRESHOLD,
            debug_dump_dir: None,
        }
    }
}

impl ConfigValidator for PipelineConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.normalizer.validate()?;
        self.validate_positive_f32(self.empty_input_threshold, "empty_input_threshold")
    }
}

/// The on-disk configuration file: model and pipeline sections, both optional.
///
/// ```json
/// {
///   "model": { "model_path": "models/mnist_model.onnx", "session_pool_size": 2 },
///   "pipeline": { "normalizer": { "resample_filter": "lanczos3" } }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(PipelineConfig::default().validate().is_ok());
        assert_eq!(
            PipelineConfig::default().empty_input_threshold,
            DEFAULT_EMPTY_INPUT_THRESHOLD
        );
    }

    #[test]
    fn test_rejects_bad_threshold_and_size() {
        let config = PipelineConfig {
            empty_input_threshold: -1.0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = PipelineConfig {
            normalizer: NormalizerConfig {
                canonical_size: 32,
                ..NormalizerConfig::default()
            },
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_app_config_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "model": { "model_path": "weights/digits.onnx", "session_pool_size": 2 },
                "pipeline": { "normalizer": { "resample_filter": "catmull_rom" }, "empty_input_threshold": 0.5 }
            }"#,
        )
        .unwrap();

        let config = AppConfig::from_json_file(&path).unwrap();
        assert_eq!(config.model.model_path, PathBuf::from("weights/digits.onnx"));
        assert_eq!(config.model.session_pool_size, 2);
        assert_eq!(
            config.pipeline.normalizer.resample_filter,
            ResampleFilter::CatmullRom
        );
        assert_eq!(config.pipeline.empty_input_threshold, 0.5);
        assert_eq!(config.pipeline.normalizer.canonical_size, CANONICAL_SIZE);
    }

    #[test]
    fn test_app_config_rejects_nearest_filter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "pipeline": { "normalizer": { "resample_filter": "nearest" } } }"#,
        )
        .unwrap();
        assert!(matches!(
            AppConfig::from_json_file(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
