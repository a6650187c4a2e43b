//! The recognition pipeline shared by both front-ends.
//!
//! A [`DigitPipeline`] chains the decoder, the normalizer, the
//! [`InferenceAdapter`] and the result shaper. The only difference between
//! front-ends is the [`EntryPoint`] it is built for.

mod adapter;
pub mod debug_dump;
mod digit_pipeline;
mod entry_point;

pub use adapter::InferenceAdapter;
pub use debug_dump::DebugDumper;
pub use digit_pipeline::DigitPipeline;
pub use entry_point::EntryPoint;
