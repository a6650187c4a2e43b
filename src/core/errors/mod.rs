//! Error types for the digit recognition pipeline.
//!
//! All fallible operations in the crate return [`DigitError`]. Each error maps
//! onto one of four user-facing kinds ([`ErrorKind`]) which the front-ends use
//! to pick how a failure is presented.
//!
//! # Usage
//!
//! ```rust
//! use digit_recognizer::core::errors::{DigitError, ErrorKind};
//!
//! let error = DigitError::inference_error_msg(
//!     "mnist_model",
//!     "unexpected output",
//!     "expected 10 classes, got 7",
//! );
//! assert_eq!(error.kind(), ErrorKind::Inference);
//! ```

pub mod constructors;
pub mod types;

pub use types::{DigitError, ErrorKind, ProcessingStage, SimpleError};

/// Convenient result alias for pipeline operations.
pub type DigitResult<T> = Result<T, DigitError>;
