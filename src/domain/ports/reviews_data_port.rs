//! Reviews endpoint port definition.

use async_trait::async_trait;

use crate::domain::entities::ReviewPage;
use crate::domain::errors::ReviewsError;

/// Port for the paged reviews endpoint.
///
/// No caching or retry happens behind this port; the caller decides.
#[async_trait]
pub trait ReviewsDataPort: Send + Sync {
    /// Fetches up to `limit` records starting at `offset`.
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<ReviewPage, ReviewsError>;
}
