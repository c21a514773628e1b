//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// HTTP transport.
pub mod http;
/// Image handling (caching, decoding, fetching).
pub mod image;
/// Reviews data sources.
pub mod reviews;

pub use config::{AppConfig, CliArgs, ConfigError, LogLevel, StorageManager};
pub use http::HttpClient;
pub use image::{CacheStats, ImageCrateDecoder, ImageFetcher, ImageFetcherConfig, MemoryImageCache};
pub use reviews::{FixtureReviewsDataSource, HttpReviewsDataSource};
