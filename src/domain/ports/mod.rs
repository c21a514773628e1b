mod http_fetch_port;
mod image_cache_port;
mod image_decoder_port;
mod image_fetcher_port;
mod reviews_data_port;

pub use http_fetch_port::{HttpFetchPort, HttpResponse};
pub use image_cache_port::ImageCachePort;
pub use image_decoder_port::ImageDecoderPort;
pub use image_fetcher_port::ImageFetcherPort;
pub use reviews_data_port::ReviewsDataPort;
