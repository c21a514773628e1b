//! Reviews endpoint over HTTP.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::entities::ReviewPage;
use crate::domain::errors::ReviewsError;
use crate::domain::ports::{HttpFetchPort, ReviewsDataPort};

use super::dto::decode_page;

/// Fetches pages from `GET {base_url}?offset={offset}&limit={limit}`.
pub struct HttpReviewsDataSource {
    http: Arc<dyn HttpFetchPort>,
    base_url: String,
}

impl HttpReviewsDataSource {
    #[must_use]
    pub fn new(http: Arc<dyn HttpFetchPort>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// URL of the page at `offset`.
    #[must_use]
    pub fn page_url(&self, offset: usize, limit: usize) -> String {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!("{}{separator}offset={offset}&limit={limit}", self.base_url)
    }
}

impl std::fmt::Debug for HttpReviewsDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpReviewsDataSource")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ReviewsDataPort for HttpReviewsDataSource {
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<ReviewPage, ReviewsError> {
        let url = self.page_url(offset, limit);
        debug!(url = %url, "Fetching reviews page");

        let response = self.http.fetch(&url).await?;

        if !response.is_success() {
            warn!(status = response.status, "Reviews endpoint returned an error");
            return Err(ReviewsError::HttpStatus(response.status));
        }

        decode_page(&response.body).map_err(|e| {
            warn!(error = %e, "Failed to parse reviews page");
            e
        })
    }
}
