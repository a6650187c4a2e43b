//! # Digit Recognizer
//!
//! Handwritten digit recognition with an ONNX classifier. Freehand drawings
//! of any size, color mode or polarity are normalized into the 28×28
//! bright-on-dark tensor an MNIST-style model expects, classified, and
//! returned as a predicted digit with its confidence and full distribution.
//!
//! ## Features
//!
//! - Deterministic normalization: grayscale, resize, rescale, invert
//! - ONNX Runtime inference with a pooled session
//! - A uniform result record: every failure is reported, never raised
//! - Two front-ends sharing one pipeline: an HTTP endpoint and an
//!   interactive drawing canvas
//!
//! ## Modules
//!
//! * [`core`] - Errors, configuration, constants, the inference engine and the classifier trait
//! * [`domain`] - Raw images, canonical tensors, distributions and prediction results
//! * [`processors`] - Decoding, normalization, result shaping and top-k ranking
//! * [`models`] - The ONNX-backed digit classifier
//! * [`pipeline`] - The shared decode → normalize → infer → shape pipeline
//! * [`server`] - The HTTP front-end
//! * [`canvas`] - The interactive front-end
//! * [`utils`] - Image loading and PNG/data-URL encoding
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use digit_recognizer::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let classifier = OnnxDigitClassifier::load(&ModelConfig::new("models/mnist_model.onnx"))?;
//! let pipeline = DigitPipeline::with_defaults(Arc::new(classifier), EntryPoint::Http);
//!
//! let image = load_image(std::path::Path::new("digit.png"))?;
//! match pipeline.run_raw(&image) {
//!     PredictionResult::Success(prediction) => {
//!         println!("{} ({:.1}%)", prediction.predicted_class, prediction.confidence * 100.0);
//!     }
//!     PredictionResult::Failure(record) => eprintln!("{}", record.message),
//! }
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod core;
pub mod domain;
pub mod models;

pub mod pipeline;
pub mod processors;
pub mod utils;

// Front-ends
pub mod canvas;
pub mod server;

/// Prelude module for convenient imports.
///
/// ```rust
/// use digit_recognizer::prelude::*;
/// ```
///
/// Included items cover the common path: loading a classifier, building a
/// pipeline and reading its results. For the front-ends and lower-level
/// processors, import from their modules.
pub mod prelude {
    // Pipeline (essential)
    pub use crate::domain::{ErrorRecord, Prediction, PredictionResult, ProbabilityVector};
    pub use crate::models::OnnxDigitClassifier;
    pub use crate::pipeline::{DigitPipeline, EntryPoint};

    // Configuration
    pub use crate::core::{AppConfig, ModelConfig, PipelineConfig};

    // Error Handling (essential)
    pub use crate::core::{Classifier, DigitError, DigitResult, ErrorKind};

    // Image Utility (minimal)
    pub use crate::utils::load_image;
}
