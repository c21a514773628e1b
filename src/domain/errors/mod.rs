//! Domain error types.

mod image_error;
mod reviews_error;
mod transport_error;

pub use image_error::ImageFetchError;
pub use reviews_error::ReviewsError;
pub use transport_error::TransportError;
