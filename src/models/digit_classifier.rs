//! ONNX-backed digit classifier.
//!
//! Wraps an [`OrtInfer`] engine holding an MNIST-style model that takes a
//! `[N, 28, 28, 1]` tensor and returns `[N, 10]` class probabilities.

use crate::core::config::{ConfigValidator, ModelConfig};
use crate::core::constants::CANONICAL_TENSOR_SHAPE;
use crate::core::errors::{DigitError, DigitResult};
use crate::core::inference::OrtInfer;
use crate::core::tensor::{Tensor2D, Tensor4D};
use crate::core::traits::Classifier;
use tracing::{info, warn};

/// The pretrained classifier, loaded once and shared read-only.
#[derive(Debug)]
pub struct OnnxDigitClassifier {
    inference: OrtInfer,
}

impl OnnxDigitClassifier {
    /// Loads the model described by `config`.
    ///
    /// # Errors
    ///
    /// Returns a startup-kind error if the configuration is invalid, the file
    /// is missing or corrupt, or the model's declared input is not compatible
    /// with `[N, 28, 28, 1]`.
    pub fn load(config: &ModelConfig) -> DigitResult<Self> {
        config.validate_positive_usize(config.session_pool_size, "session_pool_size")?;
        let inference = OrtInfer::from_config(config)?;
        let classifier = Self::from_inference(inference)?;
        info!(
            "Loaded digit classifier '{}' from {}",
            classifier.inference.model_name(),
            classifier.inference.model_path().display()
        );
        Ok(classifier)
    }

    /// Wraps an already built engine, checking its declared input shape.
    pub fn from_inference(inference: OrtInfer) -> DigitResult<Self> {
        match inference.primary_input_shape() {
            Some(shape) => {
                check_input_shape(&shape).map_err(|reason| {
                    DigitError::model_load_error(
                        inference.model_path(),
                        reason,
                        Some("export the model with an NHWC [N, 28, 28, 1] float input"),
                        None::<std::io::Error>,
                    )
                })?;
            }
            None => warn!(
                "Model '{}' does not declare a tensor input shape; skipping shape check",
                inference.model_name()
            ),
        }
        Ok(Self { inference })
    }

    pub fn inference(&self) -> &OrtInfer {
        &self.inference
    }
}

impl Classifier for OnnxDigitClassifier {
    fn classify(&self, input: &Tensor4D) -> DigitResult<Tensor2D> {
        self.inference.infer_2d(input)
    }

    fn name(&self) -> &str {
        self.inference.model_name()
    }
}

/// Checks a declared model input shape against the canonical tensor.
///
/// Negative dimensions are dynamic and accepted. A fixed batch dimension must
/// be 1 because requests are never batched.
pub(crate) fn check_input_shape(shape: &[i64]) -> Result<(), String> {
    if shape.len() != CANONICAL_TENSOR_SHAPE.len() {
        return Err(format!(
            "model input has rank {} ({shape:?}), expected [N, 28, 28, 1]",
            shape.len()
        ));
    }
    for (axis, (&declared, &expected)) in shape.iter().zip(CANONICAL_TENSOR_SHAPE.iter()).enumerate()
    {
        if declared >= 0 && declared != expected as i64 {
            return Err(format!(
                "model input dimension {axis} is {declared}, expected {expected} (declared shape {shape:?})"
            ));
        }
    }
    Ok(())
}
