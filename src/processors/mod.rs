//! Image and output processing for the recognition pipeline.
//!
//! # Modules
//!
//! * `decode` - Data-URL and RGBA buffer decoding into raw images
//! * `normalization` - Grayscale, resize, rescale and invert into the canonical tensor
//! * `postprocess` - Classifier output validation and result shaping
//! * `topk` - Ranking the most probable digits
//! * `types` - Type definitions used across the processors module

mod decode;
mod normalization;
mod postprocess;
mod topk;
pub mod types;

pub use decode::*;
pub use normalization::*;
pub use postprocess::*;
pub use topk::*;
pub use types::*;
