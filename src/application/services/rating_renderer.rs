//! Rating to glyph rendering.

/// Highest rating a review can carry.
pub const MAX_RATING: u8 = 5;

/// Renders a numeric rating as a row of filled and empty stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingRenderer {
    filled: char,
    empty: char,
}

impl RatingRenderer {
    #[must_use]
    pub const fn new(filled: char, empty: char) -> Self {
        Self { filled, empty }
    }

    /// Renders `rating`, clamped to `1..=MAX_RATING`.
    #[must_use]
    pub fn render(&self, rating: i64) -> String {
        let filled = usize::from(Self::clamp(rating));
        let empty = usize::from(MAX_RATING) - filled;

        std::iter::repeat_n(self.filled, filled)
            .chain(std::iter::repeat_n(self.empty, empty))
            .collect()
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn clamp(rating: i64) -> u8 {
        rating.clamp(1, i64::from(MAX_RATING)) as u8
    }
}

impl Default for RatingRenderer {
    fn default() -> Self {
        Self::new('★', '☆')
    }
}
