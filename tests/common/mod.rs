//! Shared fixtures for integration tests.

#![allow(dead_code)]

use digit_recognizer::canvas::DrawingCanvas;
use digit_recognizer::core::{Classifier, DigitResult, Tensor2D, Tensor4D};
use ndarray::Array2;
use std::sync::Mutex;

/// Answers every request with the same distribution and records the ink
/// (tensor sum) of each input it sees.
pub struct StubClassifier {
    output: Vec<f32>,
    seen: Mutex<Vec<f32>>,
}

impl StubClassifier {
    pub fn new(output: Vec<f32>) -> Self {
        Self {
            output,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn seen_sums(&self) -> Vec<f32> {
        self.seen.lock().unwrap().clone()
    }
}

impl Classifier for StubClassifier {
    fn classify(&self, input: &Tensor4D) -> DigitResult<Tensor2D> {
        assert_eq!(input.shape(), &[1, 28, 28, 1]);
        self.seen.lock().unwrap().push(input.sum());
        Ok(Array2::from_shape_vec((1, self.output.len()), self.output.clone()).unwrap())
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Peaks at digit 7 with probability 0.82.
pub fn seven_distribution() -> Vec<f32> {
    vec![0.01, 0.02, 0.03, 0.01, 0.02, 0.01, 0.03, 0.82, 0.03, 0.02]
}

/// A 280×280 canvas with a black "1" drawn at the default brush width.
pub fn canvas_with_one() -> DrawingCanvas {
    let mut canvas = DrawingCanvas::default();
    canvas.stroke(&[(140.0, 50.0), (140.0, 230.0)]);
    canvas
}
