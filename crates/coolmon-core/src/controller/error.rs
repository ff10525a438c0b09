//! Controller link errors

use thiserror::Error;

/// Errors that can occur while talking to the cooling controller
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Controller response timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Connection closed by controller")]
    Closed,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Command is not ASCII: {0:?}")]
    NonAscii(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
