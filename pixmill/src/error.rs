//! Error type for the pixmill facade

use thiserror::Error;

/// Errors returned by the task surface
#[derive(Debug, Error)]
pub enum Error {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] pixmill_core::Error),

    /// Resize argument error
    #[error("resize error: {0}")]
    Transform(#[from] pixmill_transform::TransformError),

    /// Conversion argument error
    #[error("convert error: {0}")]
    Color(#[from] pixmill_color::ColorError),

    /// Worker pool could not be started
    #[error("thread pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// Worker stopped before delivering its result
    #[error("task ended without a result")]
    TaskFailed,
}

/// Result type for facade operations
pub type Result<T> = std::result::Result<T, Error>;
