//! Image normalization into the classifier's input distribution.
//!
//! The classifier was trained on bright strokes over a dark background, at
//! 28×28, with intensities in `[0, 1]`. Both front-ends capture dark strokes
//! on a light background at arbitrary sizes, so every input goes through the
//! same four steps: grayscale, resize, rescale, invert. Inversion is
//! unconditional; no attempt is made to detect polarity.

use crate::core::config::{ConfigValidator, NormalizerConfig};
use crate::core::constants::{CANONICAL_SIZE, MAX_INTENSITY};
use crate::core::errors::{DigitError, DigitResult};
use crate::domain::{CanonicalTensor, RawImage};
use crate::processors::types::ResampleFilter;
use image::{GrayImage, Luma, Pixel};
use ndarray::Array4;
use std::time::Instant;
use tracing::debug;

/// ITU-R 601-2 luma weights in 16.16 fixed point (0.299, 0.587, 0.114).
const LUMA_R: u32 = 19_595;
const LUMA_G: u32 = 38_470;
const LUMA_B: u32 = 7_471;

/// Converts an RGB triple to 8-bit luma, rounding to nearest.
#[inline]
pub fn luma_601(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * LUMA_R + g as u32 * LUMA_G + b as u32 * LUMA_B + 0x8000) >> 16) as u8
}

/// Collapses any [`RawImage`] to one channel.
///
/// Single-channel input passes through unchanged. Alpha is ignored, not
/// composited: a fully transparent black pixel becomes black.
pub fn to_grayscale(image: &RawImage) -> GrayImage {
    match image {
        RawImage::Gray(gray) => gray.clone(),
        RawImage::Rgb(rgb) => GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
            let [r, g, b] = rgb.get_pixel(x, y).0;
            Luma([luma_601(r, g, b)])
        }),
        RawImage::Rgba(rgba) => GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            let [r, g, b] = rgba.get_pixel(x, y).to_rgb().0;
            Luma([luma_601(r, g, b)])
        }),
    }
}

/// Converts raw images into [`CanonicalTensor`]s.
///
/// Normalization is deterministic: the same input always yields a
/// bit-identical tensor.
#[derive(Debug, Clone)]
pub struct DigitNormalizer {
    filter: ResampleFilter,
}

impl DigitNormalizer {
    /// Creates a normalizer from validated settings.
    pub fn new(config: &NormalizerConfig) -> DigitResult<Self> {
        config.validate()?;
        Ok(Self {
            filter: config.resample_filter,
        })
    }

    /// Creates a normalizer using `filter` for resampling.
    pub fn with_filter(filter: ResampleFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> ResampleFilter {
        self.filter
    }

    /// Runs grayscale, resize, rescale and invert, and reshapes the result to
    /// `[1, 28, 28, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`DigitError::InvalidInput`] when the image has a zero
    /// dimension. No other input can fail.
    pub fn normalize(&self, image: &RawImage) -> DigitResult<CanonicalTensor> {
        let start = Instant::now();
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(DigitError::invalid_input(format!(
                "cannot normalize an image with zero size ({width}x{height})"
            )));
        }

        let gray = to_grayscale(image);
        let resized = self.resize(&gray);

        let side = CANONICAL_SIZE as usize;
        let values: Vec<f32> = resized
            .pixels()
            .map(|p| 1.0 - p.0[0] as f32 / MAX_INTENSITY)
            .collect();
        let tensor = Array4::from_shape_vec((1, side, side, 1), values).map_err(|e| {
            DigitError::normalization("failed to reshape pixels into the canonical tensor", e)
        })?;

        debug!(
            "Normalized {}x{} image ({} channel(s)) with {} in {:?}",
            width,
            height,
            image.channels(),
            self.filter,
            start.elapsed()
        );
        Ok(CanonicalTensor::from_normalized(tensor))
    }

    fn resize(&self, gray: &GrayImage) -> GrayImage {
        if gray.dimensions() == (CANONICAL_SIZE, CANONICAL_SIZE) {
            return gray.clone();
        }
        image::imageops::resize(
            gray,
            CANONICAL_SIZE,
            CANONICAL_SIZE,
            self.filter.to_filter_type(),
        )
    }
}

impl Default for DigitNormalizer {
    fn default() -> Self {
        Self::with_filter(ResampleFilter::default())
    }
}
