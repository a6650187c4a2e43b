//! Error type definitions for the digit recognition pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Processing steps that can fail outside the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Scaling, inverting and reshaping intensities.
    Normalization,
    /// Writing debug artifacts.
    DebugDump,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Normalization => write!(f, "normalization"),
            ProcessingStage::DebugDump => write!(f, "debug dump"),
        }
    }
}

/// The user-facing error taxonomy.
///
/// Every [`DigitError`] maps onto exactly one of these kinds through
/// [`DigitError::kind`]; front-ends choose their presentation from the kind
/// alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The transport payload did not yield a usable image.
    Decode,
    /// The normalized input contains no discernible stroke.
    EmptyInput,
    /// The classifier failed or produced output of the wrong shape.
    Inference,
    /// The classifier artifact could not be loaded or configured.
    Startup,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Decode => write!(f, "DecodeError"),
            ErrorKind::EmptyInput => write!(f, "EmptyInputError"),
            ErrorKind::Inference => write!(f, "InferenceError"),
            ErrorKind::Startup => write!(f, "StartupError"),
        }
    }
}

/// Enum representing the errors that can occur while decoding, normalizing
/// and classifying a digit image.
#[derive(Error, Debug)]
pub enum DigitError {
    /// The transport payload could not be decoded into an image.
    #[error("malformed payload: {context}")]
    Decode {
        /// What was being decoded when the failure happened.
        context: String,
        /// The underlying error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A processing step failed.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The processing step that failed.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The input is structurally invalid (zero dimensions, wrong buffer length).
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Nothing was drawn: the canonical tensor's mass is at or below the threshold.
    #[error("no digit found in the input (tensor sum {sum:.4} <= threshold {threshold})")]
    EmptyInput {
        /// Sum of all canonical tensor elements.
        sum: f32,
        /// The configured presence threshold.
        threshold: f32,
    },

    /// The classifier invocation failed.
    #[error("model '{model_name}': {context}")]
    Inference {
        /// Name of the model that failed.
        model_name: String,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A tensor did not have the expected shape.
    #[error(
        "tensor operation '{operation}' failed: expected shape {expected_shape:?}, got {actual_shape:?}: {context}"
    )]
    TensorOperation {
        /// The operation being performed.
        operation: String,
        /// The expected tensor shape.
        expected_shape: Vec<usize>,
        /// The actual tensor shape.
        actual_shape: Vec<usize>,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The classifier artifact could not be loaded.
    #[error("failed to load model '{model_path}': {reason}{suggestion}")]
    ModelLoad {
        /// Path to the model file.
        model_path: String,
        /// Short description of the failure.
        reason: String,
        /// Optional suggestion, already prefixed with "; suggested fix: ".
        suggestion: String,
        /// The underlying error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A configuration value is invalid.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from ndarray shape handling.
    #[error("tensor shape")]
    Tensor(#[from] ndarray::ShapeError),

    /// Error from the image crate outside of payload decoding.
    #[error("image")]
    Image(#[from] image::ImageError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl DigitError {
    /// Maps this error onto the four-way user-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DigitError::Decode { .. }
            | DigitError::InvalidInput { .. }
            | DigitError::Processing { .. }
            | DigitError::Image(_) => ErrorKind::Decode,
            DigitError::EmptyInput { .. } => ErrorKind::EmptyInput,
            DigitError::Inference { .. }
            | DigitError::TensorOperation { .. }
            | DigitError::Session(_)
            | DigitError::Tensor(_) => ErrorKind::Inference,
            DigitError::ModelLoad { .. } | DigitError::ConfigError { .. } | DigitError::Io(_) => {
                ErrorKind::Startup
            }
        }
    }
}

/// A plain message error used where no richer source exists.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct SimpleError(pub String);

impl SimpleError {
    /// Creates a new error carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
