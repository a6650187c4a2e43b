//! Structures and helpers for ONNX Runtime inference.
//!
//! This module holds the low level inference engine the digit classifier is
//! built on.

pub mod ort_infer;

pub use ort_infer::OrtInfer;

