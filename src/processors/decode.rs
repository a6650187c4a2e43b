//! Transport decoding: data URLs and RGBA buffers into [`RawImage`]s.

use crate::core::errors::{DigitError, DigitResult};
use crate::domain::RawImage;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};
use std::borrow::Cow;
use tracing::debug;

/// Turns a transport representation into a raw pixel grid.
///
/// Decoding is a pure transform: no retries, and a malformed payload is a
/// terminal failure for that request.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageDecoder;

impl ImageDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decodes a `"<prefix>,<base64 payload>"` string.
    ///
    /// Everything up to the first comma is discarded without inspection. The
    /// payload is standard base64 (ASCII whitespace anywhere in it, such as
    /// MIME line wrapping, is ignored) and the
    /// image container format is sniffed from the decoded bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DigitError::Decode`] if the comma is missing, the payload is
    /// not valid base64, or the bytes are not a supported image.
    pub fn decode_data_url(&self, data_url: &str) -> DigitResult<RawImage> {
        let (_, payload) = data_url
            .split_once(',')
            .ok_or_else(|| DigitError::decode_error_msg("data URL is missing the ',' separator"))?;

        let payload: Cow<'_, str> = if payload.bytes().any(|b| b.is_ascii_whitespace()) {
            Cow::Owned(payload.chars().filter(|c| !c.is_ascii_whitespace()).collect())
        } else {
            Cow::Borrowed(payload)
        };

        let bytes = BASE64_STANDARD
            .decode(payload.as_bytes())
            .map_err(|e| DigitError::decode_error("payload is not valid base64", e))?;

        let image = image::load_from_memory(&bytes)
            .map_err(|e| DigitError::decode_error("bytes are not a supported image", e))?;

        let raw = RawImage::from_dynamic(image);
        debug!(
            "Decoded {} payload bytes into {}x{} image with {} channel(s)",
            bytes.len(),
            raw.width(),
            raw.height(),
            raw.channels()
        );
        Ok(raw)
    }

    /// Wraps a row-major RGBA buffer from a drawing surface.
    ///
    /// # Errors
    ///
    /// Returns [`DigitError::InvalidInput`] if the buffer does not match the
    /// dimensions; callers that produce the buffer themselves never hit this.
    pub fn decode_rgba(&self, width: u32, height: u32, buffer: Vec<u8>) -> DigitResult<RawImage> {
        RawImage::from_rgba(width, height, buffer)
    }
}
