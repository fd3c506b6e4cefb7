//! Error types for pixmill-color

use thiserror::Error;

/// Errors that can occur during pixel format conversion
#[derive(Debug, Error)]
pub enum ColorError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] pixmill_core::Error),

    /// Luma weights that cannot be renormalized
    #[error("invalid luma weights: {0}")]
    InvalidWeights(String),
}

/// Result type for color operations
pub type ColorResult<T> = Result<T, ColorError>;
