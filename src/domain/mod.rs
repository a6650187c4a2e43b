//! Domain-level structures shared across the recognition pipeline.
//!
//! This module groups the values that flow through one request: the decoded
//! [`RawImage`], the normalized [`CanonicalTensor`], the classifier's
//! [`ProbabilityVector`] and the final [`PredictionResult`].

pub mod canonical;
pub mod prediction;
pub mod raw_image;

pub use canonical::CanonicalTensor;
pub use prediction::{
    ErrorRecord, PipelineStage, Prediction, PredictionResult, ProbabilityVector,
};
pub use raw_image::RawImage;
