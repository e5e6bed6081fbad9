//! Download attempt error type.

use thiserror::Error;

/// Error returned by a single download attempt.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, truncated body, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Temp file creation, write, or final rename failed.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
}

impl FetchError {
    /// True when curl gave up because of the connect or stall timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Curl(e) if e.is_operation_timedout())
    }
}
