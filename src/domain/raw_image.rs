//! The decoded pixel grid handed from the decoder to the normalizer.

use crate::core::errors::{DigitError, DigitResult};
use crate::processors::types::ChannelLayout;
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

/// An arbitrary-size 8-bit pixel grid with one, three or four channels.
///
/// Constructed fresh for each request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum RawImage {
    /// Single-channel luminance.
    Gray(GrayImage),
    /// Three-channel color.
    Rgb(RgbImage),
    /// Four-channel color with alpha.
    Rgba(RgbaImage),
}

impl RawImage {
    /// Wraps a decoded image, reducing deeper sample types to 8 bits.
    ///
    /// Luma+alpha images become single-channel: alpha is dropped, never
    /// composited.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma8(gray) => RawImage::Gray(gray),
            DynamicImage::ImageRgb8(rgb) => RawImage::Rgb(rgb),
            DynamicImage::ImageRgba8(rgba) => RawImage::Rgba(rgba),
            DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageLumaA16(_) => RawImage::Gray(image.to_luma8()),
            other if other.color().has_alpha() => RawImage::Rgba(other.to_rgba8()),
            other => RawImage::Rgb(other.to_rgb8()),
        }
    }

    /// Builds an RGBA image from a row-major pixel buffer, as produced by a
    /// drawing surface.
    ///
    /// # Errors
    ///
    /// Returns [`DigitError::InvalidInput`] when either dimension is zero or
    /// the buffer length is not `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, buffer: Vec<u8>) -> DigitResult<Self> {
        if width == 0 || height == 0 {
            return Err(DigitError::invalid_input(format!(
                "pixel buffer has zero size ({width}x{height})"
            )));
        }
        let expected = width as usize * height as usize * 4;
        let actual = buffer.len();
        RgbaImage::from_raw(width, height, buffer)
            .map(RawImage::Rgba)
            .ok_or_else(|| {
                DigitError::invalid_input(format!(
                    "RGBA buffer for {width}x{height} needs {expected} bytes, got {actual}"
                ))
            })
    }

    pub fn width(&self) -> u32 {
        match self {
            RawImage::Gray(img) => img.width(),
            RawImage::Rgb(img) => img.width(),
            RawImage::Rgba(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            RawImage::Gray(img) => img.height(),
            RawImage::Rgb(img) => img.height(),
            RawImage::Rgba(img) => img.height(),
        }
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn layout(&self) -> ChannelLayout {
        match self {
            RawImage::Gray(_) => ChannelLayout::Gray,
            RawImage::Rgb(_) => ChannelLayout::Rgb,
            RawImage::Rgba(_) => ChannelLayout::Rgba,
        }
    }

    /// Number of channels per pixel (1, 3 or 4).
    pub fn channels(&self) -> u8 {
        self.layout().channels()
    }

    /// Copies the grid into a [`DynamicImage`], e.g. for writing it to disk.
    pub fn to_dynamic(&self) -> DynamicImage {
        match self {
            RawImage::Gray(img) => DynamicImage::ImageLuma8(img.clone()),
            RawImage::Rgb(img) => DynamicImage::ImageRgb8(img.clone()),
            RawImage::Rgba(img) => DynamicImage::ImageRgba8(img.clone()),
        }
    }
}

impl From<DynamicImage> for RawImage {
    fn from(image: DynamicImage) -> Self {
        Self::from_dynamic(image)
    }
}
