//! The classifier seam.

use crate::core::errors::DigitResult;
use crate::core::tensor::{Tensor2D, Tensor4D};

/// An opaque, pretrained digit classifier.
///
/// Implementations own immutable weights, are loaded once before the first
/// request and are shared read-only across requests, hence the `Send + Sync`
/// bound. The pipeline validates the returned matrix; implementations only
/// need to run the model.
pub trait Classifier: Send + Sync {
    /// Runs the model on a `[1, 28, 28, 1]` tensor and returns its raw
    /// `[batch, classes]` output.
    fn classify(&self, input: &Tensor4D) -> DigitResult<Tensor2D>;

    /// A short name used in logs and error messages.
    fn name(&self) -> &str;
}

impl<C: Classifier + ?Sized> Classifier for std::sync::Arc<C> {
    fn classify(&self, input: &Tensor4D) -> DigitResult<Tensor2D> {
        (**self).classify(input)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
