//! Image decode port definition.

use crate::domain::errors::ImageFetchError;

/// Port for turning encoded bytes into an image.
///
/// Decoding is CPU bound; callers run it on the blocking pool.
#[cfg_attr(test, mockall::automock)]
pub trait ImageDecoderPort: Send + Sync {
    /// Decodes `bytes`, failing with [`ImageFetchError::Decode`].
    fn decode(&self, bytes: &[u8]) -> Result<image::DynamicImage, ImageFetchError>;
}
