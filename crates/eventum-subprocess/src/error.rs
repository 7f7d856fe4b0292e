use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Errors raised when executing a subprocess command.
#[derive(Debug, Error)]
pub enum SubprocessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Command `{0}` timed out after {1:?}")]
    Timeout(String, Duration),
    #[error("Command `{0}` failed with status {1}")]
    CommandFailed(String, ExitStatus),
    #[error("Command output was not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}
