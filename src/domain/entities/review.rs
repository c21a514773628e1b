//! Review records and the list items derived from them.

use uuid::Uuid;

use super::image::AvatarImage;

/// Number of text lines shown before a review is expanded.
pub const COLLAPSED_LINE_LIMIT: u32 = 3;

/// Identifier assigned to a review item when its record is mapped.
///
/// Identifiers are random, so an item produced after a refresh never
/// collides with one from an earlier generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReviewId(Uuid);

impl ReviewId {
    /// Generates a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for ReviewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Review as delivered by the reviews endpoint. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRecord {
    /// Review body.
    pub text: String,
    /// Creation timestamp exactly as the endpoint sent it.
    pub created: String,
    /// Author avatar location, if any.
    pub avatar_url: Option<String>,
    /// Rating, nominally 1 through 5.
    pub rating: i64,
    /// Author first name.
    pub first_name: String,
    /// Author last name.
    pub last_name: String,
}

/// One page of review records plus the total the endpoint reports.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewPage {
    /// Records in endpoint order.
    pub records: Vec<ReviewRecord>,
    /// Total number of reviews available.
    pub total_count: usize,
}

impl ReviewPage {
    #[must_use]
    pub const fn new(records: Vec<ReviewRecord>, total_count: usize) -> Self {
        Self {
            records,
            total_count,
        }
    }
}

/// Display-ready review held in the list state.
///
/// Only the avatar and the expansion flag change after creation.
#[derive(Debug, Clone)]
pub struct ReviewItem {
    id: ReviewId,
    display_text: String,
    created_text: String,
    full_name: String,
    rating: String,
    avatar_url: Option<String>,
    avatar: Option<AvatarImage>,
    text_expanded: bool,
}

impl ReviewItem {
    /// Creates a collapsed item without an avatar.
    #[must_use]
    pub fn new(
        id: ReviewId,
        display_text: impl Into<String>,
        created_text: impl Into<String>,
        full_name: impl Into<String>,
        rating: impl Into<String>,
        avatar_url: Option<String>,
    ) -> Self {
        Self {
            id,
            display_text: display_text.into(),
            created_text: created_text.into(),
            full_name: full_name.into(),
            rating: rating.into(),
            avatar_url: avatar_url.filter(|url| !url.trim().is_empty()),
            avatar: None,
            text_expanded: false,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ReviewId {
        self.id
    }

    #[must_use]
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    #[must_use]
    pub fn created_text(&self) -> &str {
        &self.created_text
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Rating rendered for display.
    #[must_use]
    pub fn rating(&self) -> &str {
        &self.rating
    }

    /// Avatar location, `None` when the record had no usable URL.
    #[must_use]
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    /// Resolved avatar. `None` means the placeholder should be shown.
    #[must_use]
    pub const fn avatar(&self) -> Option<&AvatarImage> {
        self.avatar.as_ref()
    }

    #[must_use]
    pub const fn is_text_expanded(&self) -> bool {
        self.text_expanded
    }

    /// Maximum number of visible text lines, `None` when unrestricted.
    #[must_use]
    pub const fn line_limit(&self) -> Option<u32> {
        if self.text_expanded {
            None
        } else {
            Some(COLLAPSED_LINE_LIMIT)
        }
    }

    /// Stores the resolved avatar. Returns false if one was already set.
    pub fn set_avatar(&mut self, image: AvatarImage) -> bool {
        if self.avatar.is_some() {
            return false;
        }
        self.avatar = Some(image);
        true
    }

    /// Lifts the line limit. Returns false if the text was already expanded.
    pub fn expand_text(&mut self) -> bool {
        if self.text_expanded {
            return false;
        }
        self.text_expanded = true;
        true
    }
}
