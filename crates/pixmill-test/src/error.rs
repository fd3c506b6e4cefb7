//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur while building regression test fixtures
#[derive(Debug, Error)]
pub enum TestError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] pixmill_core::Error),

    /// Sample list does not match the channel count of the format
    #[error("expected {expected} samples for {format}, got {actual}")]
    SampleCount {
        format: pixmill_core::PixelFormat,
        expected: usize,
        actual: usize,
    },

    /// Sample value does not fit the sample depth
    #[error("sample value {value} exceeds {max} for {format}")]
    SampleRange {
        format: pixmill_core::PixelFormat,
        value: u16,
        max: u32,
    },
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
