//! Scroll-position policy for requesting the next page.

/// Default distance from the end, in viewport heights, that triggers a load.
pub const DEFAULT_TRIGGER_SCREENS: f64 = 2.5;

/// Scroll geometry reported by the presentation layer, in any consistent unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Height of the visible area.
    pub viewport_height: f64,
    /// Height of all rendered content.
    pub content_height: f64,
    /// Offset of the top of the viewport where scrolling will come to rest.
    pub target_offset: f64,
}

impl ScrollMetrics {
    #[must_use]
    pub const fn new(viewport_height: f64, content_height: f64, target_offset: f64) -> Self {
        Self {
            viewport_height,
            content_height,
            target_offset,
        }
    }

    /// Distance left between the bottom of the viewport and the end of the content.
    #[must_use]
    pub fn remaining_distance(&self) -> f64 {
        self.content_height - self.viewport_height - self.target_offset
    }
}

/// Decides when the presentation layer should call `load_next`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTrigger {
    screens: f64,
}

impl ScrollTrigger {
    /// Creates a trigger firing within `screens` viewport heights of the end.
    /// Negative or non-finite values fall back to the default.
    #[must_use]
    pub fn new(screens: f64) -> Self {
        let screens = if screens.is_finite() && screens >= 0.0 {
            screens
        } else {
            DEFAULT_TRIGGER_SCREENS
        };
        Self { screens }
    }

    #[must_use]
    pub const fn screens(&self) -> f64 {
        self.screens
    }

    /// Returns true when the remaining content is within the trigger distance.
    #[must_use]
    pub fn should_load_next_page(&self, metrics: &ScrollMetrics) -> bool {
        let trigger_distance = metrics.viewport_height * self.screens;
        metrics.remaining_distance() <= trigger_distance
    }
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_TRIGGER_SCREENS)
    }
}
