//! The core module of the digit recognition pipeline.
//!
//! This module contains the fundamental components shared by every front-end:
//! - Configuration management
//! - Constants used throughout the pipeline
//! - Error handling
//! - ONNX Runtime inference engine integration
//! - The classifier trait
//!
//! It also provides re-exports of commonly used types and functions for convenience.

pub mod config;
pub mod constants;
pub mod errors;
pub mod inference;
pub mod tensor;
pub mod traits;

pub use config::{AppConfig, ConfigError, ConfigValidator, ModelConfig, PipelineConfig};
pub use constants::*;
pub use errors::{DigitError, DigitResult, ErrorKind, ProcessingStage};
pub use inference::OrtInfer;
pub use tensor::{Tensor2D, Tensor4D};
pub use traits::Classifier;

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// When `RUST_LOG` is unset the filter falls back to `default_directive`.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing(default_directive: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
