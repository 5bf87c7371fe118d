//! Client error types.

use thiserror::Error;

use meetingcost_core::{DurationParseError, TracingError};

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
///
/// The meeting session itself never fails; these cover the host's own
/// surfaces around it.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Clipboard or other text sink failed.
    #[error("copy failed: {0}")]
    Sink(String),

    /// A duration argument could not be parsed.
    #[error("invalid duration: {0}")]
    Duration(#[from] DurationParseError),

    /// Logging could not be initialized.
    #[error("tracing setup failed: {0}")]
    Tracing(#[from] TracingError),

    /// Output serialization failed.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ClientError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a text sink error.
    pub fn sink(message: impl Into<String>) -> Self {
        Self::Sink(message.into())
    }
}
