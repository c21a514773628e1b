//! Avatar resolution error types.

use thiserror::Error;

use super::TransportError;

/// Reasons an image URL could not be resolved to a decoded image.
///
/// `Clone` so one download result can be handed to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageFetchError {
    #[error("download failed: {0}")]
    Download(String),

    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),

    #[error("decode failed: {0}")]
    Decode(String),
}

impl ImageFetchError {
    /// Creates a decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}

impl From<TransportError> for ImageFetchError {
    fn from(error: TransportError) -> Self {
        Self::Download(error.to_string())
    }
}
