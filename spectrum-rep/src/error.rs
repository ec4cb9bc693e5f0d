//! Error types for spectrum-rep
//!
//! None of these are allowed to take down event processing: persistence and
//! snapshot failures are logged as warnings by their callers.

use thiserror::Error;

/// Main error type for spectrum-rep
#[derive(Error, Debug)]
pub enum Error {
    /// Errors surfaced by the shared library (config, schema init, score queries)
    #[error(transparent)]
    Common(#[from] spectrum_common::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot encode/decode errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Durable call exceeded its time bound
    #[error("Timed out: {0}")]
    Timeout(String),
}

/// Convenience Result type using spectrum-rep Error
pub type Result<T> = std::result::Result<T, Error>;
