//! Classifier output and the per-request result record.

use crate::core::constants::NUM_CLASSES;
use crate::core::errors::{DigitError, DigitResult, ErrorKind};
use serde::{Deserialize, Serialize};

/// Exactly ten class probabilities; index `i` belongs to digit `i`.
///
/// The values are expected to sum to roughly 1 but this is left to the
/// classifier. Non-finite values are rejected on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct ProbabilityVector([f32; NUM_CLASSES]);

impl ProbabilityVector {
    /// Builds a vector from a classifier output row.
    ///
    /// # Errors
    ///
    /// Returns an inference error if `values` does not hold exactly ten
    /// entries or contains NaN or infinity.
    pub fn from_slice(values: &[f32]) -> DigitResult<Self> {
        let array: [f32; NUM_CLASSES] = values.try_into().map_err(|_| {
            DigitError::inference_error_msg(
                "classifier",
                "output row has the wrong length",
                &format!("expected {NUM_CLASSES} entries, got {}", values.len()),
            )
        })?;
        Self::new(array)
    }

    /// Builds a vector from exactly ten values.
    pub fn new(values: [f32; NUM_CLASSES]) -> DigitResult<Self> {
        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(DigitError::inference_error_msg(
                "classifier",
                "output contains a non-finite probability",
                &format!("class {idx} has value {}", values[idx]),
            ));
        }
        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn get(&self, class: usize) -> Option<f32> {
        self.0.get(class).copied()
    }

    /// Index and value of the largest probability; ties go to the lowest index.
    pub fn argmax(&self) -> (usize, f32) {
        let mut best = (0, self.0[0]);
        for (idx, &value) in self.0.iter().enumerate().skip(1) {
            if value > best.1 {
                best = (idx, value);
            }
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.0.iter().copied()
    }
}

impl TryFrom<Vec<f32>> for ProbabilityVector {
    type Error = DigitError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        Self::from_slice(&values)
    }
}

impl From<ProbabilityVector> for Vec<f32> {
    fn from(vector: ProbabilityVector) -> Self {
        vector.0.to_vec()
    }
}

/// A successful classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// The winning digit, 0 through 9.
    pub predicted_class: u8,
    /// Probability of the winning digit; always equals the distribution maximum.
    pub confidence: f32,
    /// The full distribution.
    pub distribution: ProbabilityVector,
}

impl Prediction {
    /// Shapes a distribution into a prediction by argmax.
    pub fn from_distribution(distribution: ProbabilityVector) -> Self {
        let (class, confidence) = distribution.argmax();
        Self {
            // NUM_CLASSES is 10, so the index always fits.
            predicted_class: class as u8,
            confidence,
            distribution,
        }
    }
}

/// The pipeline stage at which a request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Decode,
    Normalize,
    ContentCheck,
    Inference,
    ResultShaping,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineStage::Decode => "decode",
            PipelineStage::Normalize => "normalization",
            PipelineStage::ContentCheck => "content check",
            PipelineStage::Inference => "inference",
            PipelineStage::ResultShaping => "result shaping",
        };
        f.write_str(name)
    }
}

/// A failed request: which kind of failure, where, and a readable message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    pub stage: PipelineStage,
    pub message: String,
}

impl ErrorRecord {
    /// Converts a pipeline error, prefixing the message with the failed stage.
    pub fn from_error(stage: PipelineStage, error: &DigitError) -> Self {
        Self {
            kind: error.kind(),
            stage,
            message: format!("{stage} failed: {}", error.full_message()),
        }
    }
}

/// The outcome of one request: exactly one of a prediction or an error record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionResult {
    Success(Prediction),
    Failure(ErrorRecord),
}

impl PredictionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, PredictionResult::Success(_))
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            PredictionResult::Success(prediction) => Some(prediction),
            PredictionResult::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorRecord> {
        match self {
            PredictionResult::Success(_) => None,
            PredictionResult::Failure(record) => Some(record),
        }
    }

    /// The error kind of a failed request.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error().map(|record| record.kind)
    }
}

impl From<Prediction> for PredictionResult {
    fn from(prediction: Prediction) -> Self {
        PredictionResult::Success(prediction)
    }
}

impl From<ErrorRecord> for PredictionResult {
    fn from(record: ErrorRecord) -> Self {
        PredictionResult::Failure(record)
    }
}
