//! Port definition for image caching.

use async_trait::async_trait;

use crate::domain::entities::{AvatarImage, ImageKey};

/// Port for image caching operations.
/// Implementations must be thread-safe.
#[async_trait]
pub trait ImageCachePort: Send + Sync {
    /// Attempts to get an image from the cache.
    /// Returns None if not cached.
    async fn get(&self, key: &ImageKey) -> Option<AvatarImage>;

    /// Stores an image in the cache, replacing any previous value for `key`.
    async fn put(&self, key: ImageKey, image: AvatarImage);

    /// Returns the current number of cached images.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all images from the cache.
    async fn clear(&self);
}
