//! Types used in image processing operations
//!
//! This module defines the enums that select how the normalizer resamples and
//! how pixel grids lay out their channels.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

/// Interpolation used when resampling to the canonical resolution.
///
/// Nearest-neighbour sampling is deliberately absent: it drops thin strokes
/// when a large canvas is shrunk to 28×28.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    /// Linear (tent) filter, the cheapest option that still averages pixels.
    Triangle,
    /// Cubic filter.
    CatmullRom,
    /// Gaussian filter.
    Gaussian,
    /// Lanczos with window 3.
    #[default]
    Lanczos3,
}

impl ResampleFilter {
    /// Converts into the `image` crate filter.
    pub fn to_filter_type(self) -> FilterType {
        match self {
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl std::fmt::Display for ResampleFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResampleFilter::Triangle => "triangle",
            ResampleFilter::CatmullRom => "catmull_rom",
            ResampleFilter::Gaussian => "gaussian",
            ResampleFilter::Lanczos3 => "lanczos3",
        };
        f.write_str(name)
    }
}

/// Channel layout of a raw pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    /// One luminance channel.
    Gray,
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
}

impl ChannelLayout {
    /// Number of 8-bit channels per pixel.
    pub fn channels(self) -> u8 {
        match self {
            ChannelLayout::Gray => 1,
            ChannelLayout::Rgb => 3,
            ChannelLayout::Rgba => 4,
        }
    }
}
