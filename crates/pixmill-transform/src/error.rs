//! Error types for pixmill-transform

use thiserror::Error;

/// Errors that can occur during resampling
#[derive(Debug, Error)]
pub enum TransformError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] pixmill_core::Error),

    /// Target width or height of zero
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Filter scale that is not a positive finite number
    #[error("invalid filter scale: {0}")]
    InvalidFilterScale(f32),

    /// Unrecognized filter name
    #[error("unknown filter: {0}")]
    UnknownFilter(String),
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;
