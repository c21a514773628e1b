//! Reviews served from a local JSON document.

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::entities::{ReviewPage, ReviewRecord};
use crate::domain::errors::ReviewsError;
use crate::domain::ports::ReviewsDataPort;

use super::dto::decode_page;

/// Pages through a `{ "items": [...], "count": N }` document held in memory.
///
/// `count` from the document is reported as the total, so a fixture may
/// claim more reviews than it carries; fetches past the end return no records.
#[derive(Debug, Clone)]
pub struct FixtureReviewsDataSource {
    records: Vec<ReviewRecord>,
    total_count: usize,
}

impl FixtureReviewsDataSource {
    #[must_use]
    pub fn new(page: ReviewPage) -> Self {
        Self {
            records: page.records,
            total_count: page.total_count,
        }
    }

    /// Parses a fixture document.
    ///
    /// # Errors
    /// Returns error if the document is not a valid reviews page.
    pub fn from_json(body: &[u8]) -> Result<Self, ReviewsError> {
        decode_page(body).map(Self::new)
    }

    /// Reads and parses a fixture file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub async fn from_path(path: &Path) -> Result<Self, ReviewsError> {
        let body = tokio::fs::read(path).await.map_err(|e| {
            ReviewsError::transport(format!("failed to read {}: {e}", path.display()))
        })?;
        let source = Self::from_json(&body)?;
        info!(
            path = %path.display(),
            records = source.records.len(),
            total = source.total_count,
            "Loaded reviews fixture"
        );
        Ok(source)
    }
}

#[async_trait]
impl ReviewsDataPort for FixtureReviewsDataSource {
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<ReviewPage, ReviewsError> {
        let start = offset.min(self.records.len());
        let end = offset.saturating_add(limit).min(self.records.len());
        debug!(offset = offset, limit = limit, returned = end - start, "Serving fixture page");

        Ok(ReviewPage::new(
            self.records[start..end].to_vec(),
            self.total_count,
        ))
    }
}
