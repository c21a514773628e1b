//! Domain layer with core entities, error taxonomies and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{ListState, ReviewId, ReviewItem, ReviewPage, ReviewRecord};
pub use errors::{ImageFetchError, ReviewsError, TransportError};
pub use ports::{HttpFetchPort, ImageCachePort, ImageDecoderPort, ImageFetcherPort, ReviewsDataPort};
