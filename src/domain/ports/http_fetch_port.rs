//! Network byte-fetch port definition.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::TransportError;

/// Raw HTTP response: status code and full body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Bytes,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for statuses in `200..300`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Port for fetching the bytes behind a URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpFetchPort: Send + Sync {
    /// Issues a GET request and returns the response whatever its status.
    async fn fetch(&self, url: &str) -> Result<HttpResponse, TransportError>;
}
