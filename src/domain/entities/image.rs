//! Domain types for avatar images.

use std::sync::Arc;

/// Decoded image shared between the cache and list snapshots.
pub type AvatarImage = Arc<image::DynamicImage>;

/// Cache key for an image: the normalized form of its URL.
///
/// Normalization trims surrounding whitespace, drops any fragment and
/// lowercases the scheme and authority. Path and query are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageKey(String);

impl ImageKey {
    /// Creates a key from a URL.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        let url = url.trim();
        let url = url.split_once('#').map_or(url, |(head, _)| head);

        let normalized = match url.split_once("://") {
            Some((scheme, rest)) => {
                let split = rest.find(['/', '?']).unwrap_or(rest.len());
                let (authority, tail) = rest.split_at(split);
                format!(
                    "{}://{}{}",
                    scheme.to_ascii_lowercase(),
                    authority.to_ascii_lowercase(),
                    tail
                )
            }
            None => url.to_string(),
        };

        Self(normalized)
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ImageKey {
    fn from(url: &str) -> Self {
        Self::from_url(url)
    }
}
