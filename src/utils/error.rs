//! Error types for the entire library.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::time::Duration;
use thiserror::Error;

/// Errors raised by the timing contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// The clock reported an exit timestamp earlier than the entry timestamp.
    /// Aggregated statistics cannot be trusted past this point.
    #[error("clock went backwards: entry at {entry:?}, exit at {exit:?}")]
    NonMonotonic { entry: Duration, exit: Duration },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
