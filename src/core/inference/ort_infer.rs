//! Core ONNX Runtime inference engine with a round-robin session pool.

use crate::core::{
    errors::DigitError,
    tensor::{Tensor2D, Tensor4D},
};
use ort::{session::Session, value::ValueType};
use std::sync::Mutex;

#[path = "ort_infer_builders.rs"]
mod ort_infer_builders;
#[path = "ort_infer_execution.rs"]
mod ort_infer_execution;
#[cfg(test)]
#[path = "ort_infer_tests.rs"]
mod ort_infer_tests;

/// A loaded ONNX model.
///
/// `Session::run` needs exclusive access, so each session sits behind a
/// mutex and requests are spread across the pool round-robin. Weights are
/// never mutated after construction.
pub struct OrtInfer {
    pub(super) sessions: Vec<Mutex<Session>>,
    pub(super) next_idx: std::sync::atomic::AtomicUsize,
    pub(super) input_name: String,
    pub(super) output_name: String,
    pub(super) model_path: std::path::PathBuf,
    pub(super) model_name: String,
}

impl std::fmt::Debug for OrtInfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtInfer")
            .field("sessions", &self.sessions.len())
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("model_path", &self.model_path)
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OrtInfer {
    /// Attempts to retrieve the primary input tensor shape from the first session.
    ///
    /// Dynamic dimensions are returned as `-1`.
    pub fn primary_input_shape(&self) -> Option<Vec<i64>> {
        let session_mutex = self.sessions.first()?;
        let session_guard = session_mutex.lock().ok()?;
        let input = session_guard
            .inputs
            .iter()
            .find(|input| input.name == self.input_name)?;
        match &input.input_type {
            ValueType::Tensor { shape, .. } => Some(shape.iter().copied().collect()),
            _ => None,
        }
    }

    /// Returns the input tensor name used for inference.
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Returns the output tensor name read after inference.
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Returns the number of pooled sessions.
    pub fn pool_size(&self) -> usize {
        self.sessions.len()
    }
}

