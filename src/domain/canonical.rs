//! The fixed-shape tensor the classifier consumes.

use crate::core::constants::{CANONICAL_SIZE, CANONICAL_TENSOR_SHAPE, MAX_INTENSITY};
use crate::core::errors::{DigitError, DigitResult, SimpleError};
use crate::core::tensor::Tensor4D;
use image::{GrayImage, Luma};
use ndarray::ArrayView4;

/// A `[1, 28, 28, 1]` `f32` tensor with every value in `[0, 1]`.
///
/// Background pixels sit near 0.0 and stroke pixels near 1.0. The only way to
/// obtain one is through the normalizer or [`CanonicalTensor::new`], both of
/// which enforce the shape and range.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTensor(Tensor4D);

impl CanonicalTensor {
    /// Wraps an existing array after checking its shape and value range.
    ///
    /// # Errors
    ///
    /// Returns a tensor operation error when the shape is not `[1, 28, 28, 1]`,
    /// or [`DigitError::InvalidInput`] when a value is non-finite or outside `[0, 1]`.
    pub fn new(tensor: Tensor4D) -> DigitResult<Self> {
        if tensor.shape() != CANONICAL_TENSOR_SHAPE {
            return Err(DigitError::tensor_operation_error(
                "canonical_tensor",
                &CANONICAL_TENSOR_SHAPE,
                tensor.shape(),
                "canonical tensor must hold exactly one 28x28 grayscale sample",
                SimpleError::new("unexpected tensor shape"),
            ));
        }
        if let Some(bad) = tensor
            .iter()
            .find(|v| !v.is_finite() || **v < 0.0 || **v > 1.0)
        {
            return Err(DigitError::invalid_input(format!(
                "canonical tensor value {bad} is outside [0, 1]"
            )));
        }
        if tensor.is_standard_layout() {
            Ok(Self(tensor))
        } else {
            Ok(Self(tensor.as_standard_layout().into_owned()))
        }
    }

    /// Constructor for the normalizer, which guarantees shape and range itself.
    pub(crate) fn from_normalized(tensor: Tensor4D) -> Self {
        debug_assert_eq!(tensor.shape(), CANONICAL_TENSOR_SHAPE);
        Self(tensor)
    }

    pub fn shape(&self) -> &[usize] {
        self.0.shape()
    }

    /// Sum of all elements; the "ink mass" used by the empty-input check.
    pub fn sum(&self) -> f32 {
        self.0.sum()
    }

    pub fn view(&self) -> ArrayView4<'_, f32> {
        self.0.view()
    }

    pub fn as_array(&self) -> &Tensor4D {
        &self.0
    }

    /// Row-major values, 784 of them.
    pub fn as_slice(&self) -> &[f32] {
        // Both constructors store standard (C-order) layout.
        self.0.as_slice().unwrap_or(&[])
    }

    /// Value at row `y`, column `x`.
    pub fn get(&self, y: usize, x: usize) -> Option<f32> {
        self.0.get([0, y, x, 0]).copied()
    }

    pub fn into_inner(self) -> Tensor4D {
        self.0
    }

    /// Scales the tensor back to an 8-bit 28×28 image (bright stroke on dark).
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(CANONICAL_SIZE, CANONICAL_SIZE, |x, y| {
            let v = self.0[[0, y as usize, x as usize, 0]];
            Luma([(v * MAX_INTENSITY).round().clamp(0.0, MAX_INTENSITY) as u8])
        })
    }
}

impl AsRef<Tensor4D> for CanonicalTensor {
    fn as_ref(&self) -> &Tensor4D {
        &self.0
    }
}
