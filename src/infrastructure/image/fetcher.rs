//! Cache-aware avatar fetcher.
//!
//! Resolution order: memory cache, then network. Concurrent resolutions of
//! the same URL share one download, and the number of simultaneous downloads
//! is bounded.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tracing::{debug, info, trace};

use crate::domain::entities::{AvatarImage, ImageKey};
use crate::domain::errors::ImageFetchError;
use crate::domain::ports::{HttpFetchPort, ImageCachePort, ImageDecoderPort, ImageFetcherPort};

type SharedResolve = Shared<BoxFuture<'static, Result<AvatarImage, ImageFetchError>>>;

/// Configuration for the image fetcher.
#[derive(Debug, Clone)]
pub struct ImageFetcherConfig {
    /// Maximum images in memory cache.
    pub cache_capacity: usize,
    /// Maximum concurrent downloads.
    pub max_concurrent_downloads: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ImageFetcherConfig {
    fn default() -> Self {
        Self {
            cache_capacity: super::memory_cache::DEFAULT_CACHE_SIZE,
            max_concurrent_downloads: 4,
            timeout_secs: 30,
        }
    }
}

/// Resolves image URLs to decoded images through a shared cache.
pub struct ImageFetcher {
    pipeline: Arc<Pipeline>,
    in_flight: Mutex<HashMap<ImageKey, SharedResolve>>,
}

/// Download and decode stages, shared with in-flight resolutions.
struct Pipeline {
    cache: Arc<dyn ImageCachePort>,
    http: Arc<dyn HttpFetchPort>,
    decoder: Arc<dyn ImageDecoderPort>,
    semaphore: Semaphore,
}

impl std::fmt::Debug for ImageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFetcher")
            .field("cached", &self.pipeline.cache.len())
            .field("in_flight", &self.in_flight.lock().len())
            .finish_non_exhaustive()
    }
}

impl ImageFetcher {
    /// Creates a fetcher. `max_concurrent_downloads` of zero is treated as one.
    #[must_use]
    pub fn new(
        cache: Arc<dyn ImageCachePort>,
        http: Arc<dyn HttpFetchPort>,
        decoder: Arc<dyn ImageDecoderPort>,
        max_concurrent_downloads: usize,
    ) -> Self {
        Self {
            pipeline: Arc::new(Pipeline {
                cache,
                http,
                decoder,
                semaphore: Semaphore::new(max_concurrent_downloads.max(1)),
            }),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Number of URLs currently being downloaded or decoded.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.in_flight.lock().len()
    }

    /// Clears the cache. Downloads already running still store their result.
    pub async fn clear_cache(&self) {
        self.pipeline.cache.clear().await;
        info!("Cleared image cache");
    }

    fn join_or_start(&self, key: &ImageKey, url: &str) -> SharedResolve {
        let mut in_flight = self.in_flight.lock();
        if let Some(existing) = in_flight.get(key) {
            trace!(key = %key, "Joining in-flight download");
            return existing.clone();
        }

        let pipeline = self.pipeline.clone();
        let task_key = key.clone();
        let url = url.to_string();
        let resolve = async move { pipeline.download(task_key, url).await }
            .boxed()
            .shared();
        in_flight.insert(key.clone(), resolve.clone());
        resolve
    }

    fn finish(&self, key: &ImageKey, resolve: &SharedResolve) {
        let mut in_flight = self.in_flight.lock();
        if in_flight.get(key).is_some_and(|current| current.ptr_eq(resolve)) {
            in_flight.remove(key);
        }
    }
}

impl Pipeline {
    async fn download(&self, key: ImageKey, url: String) -> Result<AvatarImage, ImageFetchError> {
        let response = {
            let _permit = self
                .semaphore
                .acquire()
                .await
                .map_err(|e| ImageFetchError::Download(format!("download pool closed: {e}")))?;

            debug!(url = %url, "Downloading image from network");
            self.http.fetch(&url).await?
        };

        if !response.is_success() {
            return Err(ImageFetchError::HttpStatus(response.status));
        }

        let decoder = self.decoder.clone();
        let body = response.body;
        let decoded = tokio::task::spawn_blocking(move || decoder.decode(&body))
            .await
            .map_err(|e| ImageFetchError::decode(format!("decode task panicked: {e}")))??;

        let image = Arc::new(decoded);
        self.cache.put(key, image.clone()).await;

        debug!(url = %url, source = "network", "Image loaded successfully");
        Ok(image)
    }
}

#[async_trait]
impl ImageFetcherPort for ImageFetcher {
    async fn resolve(&self, url: &str) -> Result<AvatarImage, ImageFetchError> {
        let key = ImageKey::from_url(url);

        if let Some(image) = self.pipeline.cache.get(&key).await {
            return Ok(image);
        }

        let resolve = self.join_or_start(&key, url);
        let result = resolve.clone().await;
        self.finish(&key, &resolve);
        result
    }
}
