//! Image handling infrastructure.
//!
//! This module provides:
//! - Memory caching with LRU eviction
//! - Decoding through the `image` crate
//! - Cache-aware, single-flight image fetching

pub mod decoder;
pub mod fetcher;
pub mod memory_cache;

pub use decoder::ImageCrateDecoder;
pub use fetcher::{ImageFetcher, ImageFetcherConfig};
pub use memory_cache::{CacheStats, MemoryImageCache};
