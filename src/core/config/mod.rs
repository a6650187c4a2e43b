//! Configuration management for the digit recognition pipeline.
//!
//! Configuration types are plain serde structs with defaults, validated through
//! the [`ConfigValidator`] trait. They can be assembled in code or loaded from
//! a JSON file through [`AppConfig::from_json_file`].

pub mod errors;
pub mod model;
pub mod onnx;
pub mod pipeline;

pub use errors::{ConfigError, ConfigValidator};
pub use model::ModelConfig;
pub use onnx::*;
pub use pipeline::{AppConfig, NormalizerConfig, PipelineConfig};
