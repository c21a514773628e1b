//! reqwest-backed byte fetcher.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{trace, warn};

use crate::domain::errors::TransportError;
use crate::domain::ports::{HttpFetchPort, HttpResponse};

const USER_AGENT: &str = concat!("review-feed/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client shared by the reviews source and the image fetcher.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client with the default timeout.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client whose requests fail after `timeout`.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::other(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    fn classify(error: &reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout
        } else if error.is_connect() {
            TransportError::Connect(error.to_string())
        } else {
            TransportError::other(error.to_string())
        }
    }
}

#[async_trait]
impl HttpFetchPort for HttpClient {
    async fn fetch(&self, url: &str) -> Result<HttpResponse, TransportError> {
        trace!(url = %url, "GET");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Request failed");
            Self::classify(&e)
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            warn!(url = %url, error = %e, "Failed to read body");
            Self::classify(&e)
        })?;

        Ok(HttpResponse { status, body })
    }
}
