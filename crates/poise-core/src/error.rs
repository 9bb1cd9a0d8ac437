//! Error types for Poise
//!
//! Classification is total and never fails; these errors only surface
//! at I/O boundaries (decoding recordings, writing exports, bootstrap).

use thiserror::Error;

/// Boundary errors
#[derive(Error, Debug)]
pub enum PoiseError {
    // Input errors
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Invalid recording line {line}: {reason}")]
    InvalidRecordingLine { line: usize, reason: String },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Output errors
    #[error("Export failed: {0}")]
    ExportFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Bootstrap errors
    #[error("Logging already initialized: {0}")]
    LoggingInit(String),
}

/// Result type for Poise boundary operations
pub type PoiseResult<T> = Result<T, PoiseError>;
