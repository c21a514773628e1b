//! Snapshot of the review list handed to the presentation layer.

use super::review::{ReviewId, ReviewItem};

/// Trailing summary shown once pagination is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewFooter {
    /// Number of reviews in the list when the footer was produced.
    pub review_count: usize,
}

impl ReviewFooter {
    #[must_use]
    pub const fn new(review_count: usize) -> Self {
        Self { review_count }
    }

    /// Summary line, e.g. "45 reviews".
    #[must_use]
    pub fn summary(&self) -> String {
        if self.review_count == 1 {
            "1 review".to_string()
        } else {
            format!("{} reviews", self.review_count)
        }
    }
}

impl std::fmt::Display for ReviewFooter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary())
    }
}

/// Row of the rendered list.
#[derive(Debug, Clone, Copy)]
pub enum ListRow<'a> {
    Review(&'a ReviewItem),
    Footer(&'a ReviewFooter),
}

/// Immutable view of the list, produced on every state change.
#[derive(Debug, Clone)]
pub struct ListState {
    /// Items in load order.
    pub items: Vec<ReviewItem>,
    /// Number of records requested so far.
    pub offset: usize,
    /// Records requested per page.
    pub page_size: usize,
    /// Total reported by the last successful page, `None` before the first.
    pub total_count: Option<usize>,
    /// Whether another page may be requested.
    pub has_more: bool,
    /// Whether a page request is outstanding.
    pub is_load_in_flight: bool,
    /// Trailing summary, present once pagination is exhausted.
    pub footer: Option<ReviewFooter>,
    /// Load generation; bumped by every refresh.
    pub generation: u64,
}

impl ListState {
    /// Number of review items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up an item by id.
    #[must_use]
    pub fn item(&self, id: ReviewId) -> Option<&ReviewItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Rows to render: every review, then the footer if present.
    pub fn rows(&self) -> impl Iterator<Item = ListRow<'_>> {
        self.items
            .iter()
            .map(ListRow::Review)
            .chain(self.footer.iter().map(ListRow::Footer))
    }
}
