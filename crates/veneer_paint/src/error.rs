//! Paint error types

use thiserror::Error;

/// Errors from setting up or exporting a raster surface
///
/// Drawing itself never fails; these only come from allocation and encoding.
#[derive(Error, Debug)]
pub enum PaintError {
    #[error("invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("image data length {actual} does not match {width}x{height} RGBA")]
    InvalidImageData {
        width: u32,
        height: u32,
        actual: usize,
    },

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PaintError>;
