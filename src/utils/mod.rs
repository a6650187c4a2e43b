//! Utility functions for the recognition pipeline.
//!
//! Image loading and PNG/data-URL encoding shared by the front-ends.

pub mod image;

pub use self::image::{PNG_DATA_URL_PREFIX, encode_png, encode_png_data_url, load_image};
