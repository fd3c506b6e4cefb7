//! Error types for pixmill-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Every variant is raised while validating caller input, before any pixel
//! data is read or written.

use thiserror::Error;

/// Pixmill core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Row stride shorter than one row of pixels
    #[error("stride too short: {stride} bytes < {min} bytes per row")]
    StrideTooShort { stride: u32, min: u32 },

    /// Backing buffer shorter than the declared geometry requires
    #[error("image data too small: {len} bytes < {required} bytes required")]
    BufferTooSmall { len: usize, required: usize },

    /// Image geometry does not fit in memory addressing
    #[error("image too large: {width}x{height} with stride {stride}")]
    TooLarge { width: u32, height: u32, stride: u32 },

    /// Unrecognized pixel format name
    #[error("unknown pixel format: {0}")]
    UnknownFormat(String),

    /// Pixel formats differ where they must match
    #[error("pixel format mismatch: {0} vs {1}")]
    FormatMismatch(crate::PixelFormat, crate::PixelFormat),

    /// Rectangle outside the image bounds
    #[error("region {x},{y} {width}x{height} outside {image_width}x{image_height} image")]
    RegionOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for pixmill core operations
pub type Result<T> = std::result::Result<T, Error>;
