//! Byte-fetch transport error types.

use thiserror::Error;

/// Failure of the network byte-fetch primitive before any response arrived.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("failed to connect: {0}")]
    Connect(String),

    #[error("transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Creates a generic transport error.
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
