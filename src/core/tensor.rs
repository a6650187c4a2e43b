//! Tensor aliases shared by the inference engine and the pipeline.

/// A 2-dimensional tensor of f32 values, shaped `[batch, classes]` for classifier output.
pub type Tensor2D = ndarray::Array2<f32>;

/// A 4-dimensional tensor of f32 values, shaped `[batch, height, width, channels]` for model input.
pub type Tensor4D = ndarray::Array4<f32>;
