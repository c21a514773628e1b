use serde::{Deserialize, Serialize};

use crate::domain::entities::{ReviewPage, ReviewRecord};
use crate::domain::errors::ReviewsError;

/// Reviews endpoint page body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReviewsResponse {
    /// Reviews in this page.
    pub items: Vec<ReviewResponse>,
    /// Total number of reviews.
    pub count: usize,
}

/// Single review as sent by the endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReviewResponse {
    pub text: String,
    pub created: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub rating: i64,
    pub first_name: String,
    pub last_name: String,
}

impl From<ReviewResponse> for ReviewRecord {
    fn from(review: ReviewResponse) -> Self {
        Self {
            text: review.text,
            created: review.created,
            avatar_url: review.avatar_url,
            rating: review.rating,
            first_name: review.first_name,
            last_name: review.last_name,
        }
    }
}

impl From<ReviewsResponse> for ReviewPage {
    fn from(response: ReviewsResponse) -> Self {
        Self::new(
            response.items.into_iter().map(ReviewRecord::from).collect(),
            response.count,
        )
    }
}

/// Parses a page body.
///
/// # Errors
/// Returns [`ReviewsError::Decode`] for malformed JSON and
/// [`ReviewsError::Data`] for JSON of the wrong shape.
pub fn decode_page(body: &[u8]) -> Result<ReviewPage, ReviewsError> {
    serde_json::from_slice::<ReviewsResponse>(body)
        .map(ReviewPage::from)
        .map_err(|e| ReviewsError::from_json(&e))
}
