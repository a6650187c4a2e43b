//! Traits at the seams of the digit recognition pipeline.

pub mod classifier;

pub use classifier::Classifier;
