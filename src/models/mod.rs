//! Model adapters.
//!
//! Concrete [`Classifier`](crate::core::traits::Classifier) implementations
//! backed by ONNX Runtime.

pub mod digit_classifier;

pub use digit_classifier::OnnxDigitClassifier;
