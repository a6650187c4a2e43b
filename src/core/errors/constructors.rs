//! Error constructor utilities.
//!
//! Helper functions for building [`DigitError`] values with consistent
//! context strings, plus [`DigitError::full_message`] which flattens an
//! error and its source chain into the single human-readable line that
//! front-ends show to users.
//!
//! ```rust
//! use digit_recognizer::core::errors::{DigitError, ErrorKind};
//!
//! let error = DigitError::decode_error_msg("data URL is missing the ',' separator");
//! assert_eq!(error.kind(), ErrorKind::Decode);
//! ```

use super::types::{DigitError, ProcessingStage, SimpleError};

impl DigitError {
    /// Creates a decode error wrapping an underlying cause.
    pub fn decode_error(
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Decode {
            context: context.into(),
            source: Some(Box::new(error)),
        }
    }

    /// Creates a decode error with only a message.
    pub fn decode_error_msg(context: impl Into<String>) -> Self {
        Self::Decode {
            context: context.into(),
            source: None,
        }
    }

    #[inline]
    fn processing_with_context(
        kind: ProcessingStage,
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates an error for a failed normalization step.
    pub fn normalization(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing_with_context(ProcessingStage::Normalization, context, error)
    }

    /// Creates an error for a debug image that could not be written.
    pub fn debug_dump(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing_with_context(ProcessingStage::DebugDump, context, error)
    }

    /// Creates an error for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an error signalling that nothing was drawn.
    pub fn empty_input(sum: f32, threshold: f32) -> Self {
        Self::EmptyInput { sum, threshold }
    }

    /// Creates a configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates an inference error for `model_name`.
    pub fn inference_error(
        model_name: &str,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model_name: model_name.to_string(),
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates an inference error with a plain message as its source.
    pub fn inference_error_msg(model_name: &str, context: &str, message: &str) -> Self {
        Self::inference_error(model_name, context, SimpleError::new(message))
    }

    /// Creates an error for model load failures with an optional suggestion.
    pub fn model_load_error(
        model_path: impl AsRef<std::path::Path>,
        reason: impl Into<String>,
        suggestion: Option<&str>,
        source: Option<impl std::error::Error + Send + Sync + 'static>,
    ) -> Self {
        let suggestion = suggestion
            .map(|s| format!("; suggested fix: {s}"))
            .unwrap_or_default();
        Self::ModelLoad {
            model_path: model_path.as_ref().display().to_string(),
            reason: reason.into(),
            suggestion,
            source: source.map(|e| Box::new(e) as _),
        }
    }

    /// Creates an error for a tensor with an unexpected shape.
    pub fn tensor_operation_error(
        operation: &str,
        expected_shape: &[usize],
        actual_shape: &[usize],
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::TensorOperation {
            operation: operation.to_string(),
            expected_shape: expected_shape.to_vec(),
            actual_shape: actual_shape.to_vec(),
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Renders this error followed by every source in its chain, separated by `": "`.
    ///
    /// Sources whose text is already contained in the accumulated message are
    /// skipped, so transparent wrappers do not repeat themselves.
    pub fn full_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            let text = err.to_string();
            if !text.is_empty() && !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = err.source();
        }
        message
    }
}
