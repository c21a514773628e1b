//! `image`-crate backed decoder.

use tracing::trace;

use crate::domain::errors::ImageFetchError;
use crate::domain::ports::ImageDecoderPort;

/// Decodes PNG, JPEG and WebP bytes with format sniffing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateDecoder;

impl ImageCrateDecoder {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ImageDecoderPort for ImageCrateDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<image::DynamicImage, ImageFetchError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| ImageFetchError::decode(format!("failed to decode image: {e}")))?;
        trace!(
            width = decoded.width(),
            height = decoded.height(),
            "Decoded image"
        );
        Ok(decoded)
    }
}
