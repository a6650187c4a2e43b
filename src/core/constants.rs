//! Constants used throughout the digit recognition pipeline.

/// Side length, in pixels, of the canonical classifier input.
pub const CANONICAL_SIZE: u32 = 28;

/// Shape of the canonical tensor: one sample, 28 rows, 28 columns, one channel (NHWC).
pub const CANONICAL_TENSOR_SHAPE: [usize; 4] = [1, CANONICAL_SIZE as usize, CANONICAL_SIZE as usize, 1];

/// Number of digit classes produced by the classifier.
pub const NUM_CLASSES: usize = 10;

/// Maximum 8-bit intensity, used to rescale pixels into `[0, 1]`.
pub const MAX_INTENSITY: f32 = 255.0;

/// Minimum canonical tensor sum for an input to count as "something was drawn".
///
/// Inputs whose sum is at or below this value are reported as empty rather
/// than classified.
pub const DEFAULT_EMPTY_INPUT_THRESHOLD: f32 = 0.1;

/// Default location of the classifier artifact, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "models/mnist_model.onnx";

/// Default side length of the interactive drawing surface.
pub const DEFAULT_CANVAS_SIZE: u32 = 280;

/// Default brush diameter of the interactive drawing surface.
pub const DEFAULT_STROKE_WIDTH: u32 = 20;

/// Number of ranked digits shown by the interactive front-end.
pub const DEFAULT_TOPK: usize = 3;

/// Default maximum accepted HTTP request body, in bytes.
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Default HTTP port, matching the web front-end's expectations.
pub const DEFAULT_PORT: u16 = 8000;
