//! Utility functions for loading and encoding images.
//!
//! These helpers are shared by the decoder, the debug dumps and the drawing
//! canvas: reading an image file into a [`RawImage`], and encoding pixels as
//! PNG bytes or as a `data:image/png;base64,...` URL.

use crate::core::errors::{DigitError, DigitResult};
use crate::domain::RawImage;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Prefix of the data URLs produced by [`encode_png_data_url`].
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Loads an image file into a [`RawImage`], keeping its channel layout.
///
/// # Errors
///
/// Returns [`DigitError::Image`] if the file cannot be opened or decoded.
pub fn load_image(path: &std::path::Path) -> DigitResult<RawImage> {
    let img = image::open(path)?;
    Ok(RawImage::from_dynamic(img))
}

/// Encodes an image as PNG bytes.
pub fn encode_png(image: &DynamicImage) -> DigitResult<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .map_err(|e| DigitError::decode_error("failed to encode PNG", e))?;
    Ok(bytes.into_inner())
}

/// Encodes an image as a PNG data URL, the format browsers' `toDataURL` emits.
pub fn encode_png_data_url(image: &DynamicImage) -> DigitResult<String> {
    let bytes = encode_png(image)?;
    Ok(format!(
        "{PNG_DATA_URL_PREFIX}{}",
        BASE64_STANDARD.encode(bytes)
    ))
}
