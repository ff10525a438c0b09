//! Tailing errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading the trailing block of a log file
#[derive(Error, Debug)]
pub enum TailError {
    /// The log file does not exist yet. Pollers should retry later.
    #[error("Log file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl TailError {
    /// Whether this error is transient (the log may simply not exist yet)
    pub fn is_not_found(&self) -> bool {
        matches!(self, TailError::NotFound(_))
    }
}
