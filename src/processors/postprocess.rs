//! Post-processing of classifier output into prediction records.

use crate::core::constants::NUM_CLASSES;
use crate::core::errors::{DigitError, DigitResult, SimpleError};
use crate::core::tensor::Tensor2D;
use crate::domain::{ErrorRecord, PipelineStage, Prediction, PredictionResult, ProbabilityVector};

/// Extracts row 0 of a `[batch, classes]` output as a [`ProbabilityVector`].
///
/// # Errors
///
/// Returns an inference error if the matrix has no rows, its rows do not
/// have exactly ten entries, or any value is non-finite.
pub fn extract_distribution(output: &Tensor2D, model_name: &str) -> DigitResult<ProbabilityVector> {
    let (rows, cols) = output.dim();
    if rows == 0 || cols != NUM_CLASSES {
        return Err(DigitError::tensor_operation_error(
            "extract_distribution",
            &[1, NUM_CLASSES],
            &[rows, cols],
            &format!("model '{model_name}' must return one row of {NUM_CLASSES} probabilities"),
            SimpleError::new("unexpected classifier output shape"),
        ));
    }
    let row: Vec<f32> = output.row(0).to_vec();
    ProbabilityVector::from_slice(&row).map_err(|e| {
        DigitError::inference_error(model_name, "classifier output is not a valid distribution", e)
    })
}

/// Packages distributions and failures into [`PredictionResult`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResultShaper;

impl ResultShaper {
    pub fn new() -> Self {
        Self
    }

    /// Argmax with lowest-index tie-break; confidence is the maximum value.
    pub fn success(&self, distribution: ProbabilityVector) -> PredictionResult {
        PredictionResult::Success(Prediction::from_distribution(distribution))
    }

    /// Converts the error raised by `stage` into the error variant.
    pub fn failure(&self, stage: PipelineStage, error: &DigitError) -> PredictionResult {
        PredictionResult::Failure(ErrorRecord::from_error(stage, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ErrorKind;
    use ndarray::{Array2, array};

    #[test]
    fn test_extract_distribution_takes_first_row() {
        let output = array![
            [0.1, 0.05, 0.05, 0.6, 0.0, 0.0, 0.0, 0.1, 0.05, 0.05],
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]
        ];
        let distribution = extract_distribution(&output, "stub").unwrap();
        assert_eq!(distribution.get(3), Some(0.6));

        let result = ResultShaper::new().success(distribution);
        let prediction = result.prediction().unwrap();
        assert_eq!(prediction.predicted_class, 3);
        assert_eq!(prediction.confidence, 0.6);
    }

    #[test]
    fn test_wrong_width_is_inference_error() {
        let output = Array2::<f32>::zeros((1, 9));
        let err = extract_distribution(&output, "stub").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Inference);

        let output = Array2::<f32>::zeros((0, 10));
        assert!(extract_distribution(&output, "stub").is_err());
    }

    #[test]
    fn test_non_finite_output_is_inference_error() {
        let mut output = Array2::<f32>::zeros((1, 10));
        output[[0, 7]] = f32::INFINITY;
        let err = extract_distribution(&output, "stub").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Inference);
    }

    #[test]
    fn test_failure_carries_stage_and_kind() {
        let err = DigitError::empty_input(0.0, 0.1);
        let result = ResultShaper::new().failure(PipelineStage::ContentCheck, &err);
        let record = result.error().unwrap();
        assert_eq!(record.kind, ErrorKind::EmptyInput);
        assert!(record.message.starts_with("content check failed: no digit found"));
    }
}
