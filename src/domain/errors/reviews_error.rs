//! Reviews page fetch error types.

use thiserror::Error;

use super::TransportError;

/// Reviews page fetch error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum ReviewsError {
    #[error("network error while fetching reviews: {0}")]
    Transport(String),

    #[error("reviews endpoint returned HTTP {0}")]
    HttpStatus(u16),

    #[error("malformed reviews body: {0}")]
    Decode(String),

    #[error("reviews body has unexpected shape: {0}")]
    Data(String),
}

impl ReviewsError {
    /// Creates transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Creates data error.
    #[must_use]
    pub fn data(message: impl Into<String>) -> Self {
        Self::Data(message.into())
    }

    /// Classifies a JSON error: syntax and truncation are decode failures,
    /// well-formed JSON of the wrong shape is a data failure.
    #[must_use]
    pub fn from_json(error: &serde_json::Error) -> Self {
        use serde_json::error::Category;

        match error.classify() {
            Category::Data => Self::data(error.to_string()),
            Category::Io | Category::Syntax | Category::Eof => Self::decode(error.to_string()),
        }
    }

    /// Returns whether error is network related.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns whether retrying the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::HttpStatus(status) => *status >= 500 || *status == 429,
            Self::Decode(_) | Self::Data(_) => false,
        }
    }
}

impl From<TransportError> for ReviewsError {
    fn from(error: TransportError) -> Self {
        Self::Transport(error.to_string())
    }
}
