//! The inference adapter: one classifier call per canonical tensor.

use crate::core::errors::{DigitError, DigitResult, ErrorKind};
use crate::core::traits::Classifier;
use crate::domain::{CanonicalTensor, ProbabilityVector};
use crate::processors::extract_distribution;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Wraps the shared classifier and validates what it returns.
///
/// There is no retry: the classifier is pure given its loaded weights, so a
/// failure is reported as-is.
#[derive(Clone)]
pub struct InferenceAdapter {
    classifier: Arc<dyn Classifier>,
}

impl InferenceAdapter {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Runs the classifier and extracts row 0 of its output.
    ///
    /// # Errors
    ///
    /// Every failure is inference-kind: errors raised by the classifier are
    /// wrapped if they carry another kind, and outputs that are not
    /// `[n >= 1, 10]` or contain non-finite values are rejected.
    pub fn infer(&self, tensor: &CanonicalTensor) -> DigitResult<ProbabilityVector> {
        let start = Instant::now();
        let name = self.classifier.name();
        let output = self
            .classifier
            .classify(tensor.as_array())
            .map_err(|e| match e.kind() {
                ErrorKind::Inference => e,
                _ => DigitError::inference_error(name, "classifier invocation failed", e),
            })?;
        debug!(
            "Classifier '{}' returned {:?} in {:?}",
            name,
            output.shape(),
            start.elapsed()
        );
        extract_distribution(&output, name)
    }
}

impl std::fmt::Debug for InferenceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceAdapter")
            .field("classifier", &self.classifier.name())
            .finish()
    }
}
