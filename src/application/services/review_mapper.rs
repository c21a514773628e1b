//! Maps wire review records into display-ready list items.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::domain::entities::{ReviewId, ReviewItem, ReviewRecord};

use super::rating_renderer::RatingRenderer;

/// Default display format for review creation dates.
pub const DEFAULT_CREATED_FORMAT: &str = "%d.%m.%Y";

/// Turns records into items, assigning each a fresh id.
#[derive(Debug, Clone)]
pub struct ReviewMapper {
    rating_renderer: RatingRenderer,
    created_format: String,
}

impl ReviewMapper {
    /// Creates a mapper. An invalid `created_format` falls back to the default.
    #[must_use]
    pub fn new(rating_renderer: RatingRenderer, created_format: impl Into<String>) -> Self {
        let created_format = created_format.into();
        let created_format = if StrftimeItems::new(&created_format).any(|i| matches!(i, Item::Error)) {
            warn!(format = %created_format, "Invalid date format, using default");
            DEFAULT_CREATED_FORMAT.to_string()
        } else {
            created_format
        };

        Self {
            rating_renderer,
            created_format,
        }
    }

    /// Maps one record.
    #[must_use]
    pub fn map(&self, record: ReviewRecord) -> ReviewItem {
        let full_name = format!("{} {}", record.first_name.trim(), record.last_name.trim())
            .trim()
            .to_string();

        ReviewItem::new(
            ReviewId::generate(),
            record.text.trim(),
            self.format_created(&record.created),
            full_name,
            self.rating_renderer.render(record.rating),
            record.avatar_url,
        )
    }

    /// Maps a page of records, keeping endpoint order.
    #[must_use]
    pub fn map_all(&self, records: Vec<ReviewRecord>) -> Vec<ReviewItem> {
        records.into_iter().map(|record| self.map(record)).collect()
    }

    /// Re-renders RFC 3339 timestamps and plain dates; anything else is shown as-is.
    fn format_created(&self, created: &str) -> String {
        let created = created.trim();

        if let Ok(timestamp) = DateTime::parse_from_rfc3339(created) {
            return timestamp.format(&self.created_format).to_string();
        }
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(created, "%Y-%m-%dT%H:%M:%S") {
            return timestamp.format(&self.created_format).to_string();
        }
        if let Ok(date) = NaiveDate::parse_from_str(created, "%Y-%m-%d") {
            return date.format(&self.created_format).to_string();
        }

        created.to_string()
    }
}

impl Default for ReviewMapper {
    fn default() -> Self {
        Self::new(RatingRenderer::default(), DEFAULT_CREATED_FORMAT)
    }
}
