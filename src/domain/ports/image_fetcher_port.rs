//! Avatar resolution port definition.

use async_trait::async_trait;

use crate::domain::entities::AvatarImage;
use crate::domain::errors::ImageFetchError;

/// Port for resolving an image URL to a decoded image.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageFetcherPort: Send + Sync {
    /// Resolves `url`, consulting the cache before the network.
    async fn resolve(&self, url: &str) -> Result<AvatarImage, ImageFetchError>;
}
