//! In-memory LRU image cache implementation.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::domain::entities::{AvatarImage, ImageKey};
use crate::domain::ports::ImageCachePort;

/// Default maximum number of images to cache in memory.
pub const DEFAULT_CACHE_SIZE: usize = 100;

/// In-memory LRU cache for decoded images.
///
/// Capacity bounded: inserting past capacity evicts the least recently
/// used entry. The lock is never held across an await point.
pub struct MemoryImageCache {
    cache: Mutex<LruCache<ImageKey, AvatarImage>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryImageCache {
    /// Creates a new cache with the specified capacity. Zero is treated as one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(cap)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Creates a new cache with the default capacity.
    #[must_use]
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }

    /// Maximum number of entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cache.lock().cap().get()
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: self.len(),
        }
    }

    /// Peeks at an image without promoting it in the LRU or counting a hit.
    #[must_use]
    pub fn peek(&self, key: &ImageKey) -> Option<AvatarImage> {
        self.cache.lock().peek(key).cloned()
    }
}

impl Default for MemoryImageCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

impl std::fmt::Debug for MemoryImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryImageCache")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached images.
    pub size: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} images, {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.hit_rate, self.hits, self.misses
        )
    }
}

#[async_trait]
impl ImageCachePort for MemoryImageCache {
    async fn get(&self, key: &ImageKey) -> Option<AvatarImage> {
        let cached = self.cache.lock().get(key).cloned();
        if cached.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Memory cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Memory cache miss");
        }
        cached
    }

    async fn put(&self, key: ImageKey, image: AvatarImage) {
        debug!(key = %key, "Storing image in memory cache");
        if let Some((evicted, _)) = self.cache.lock().push(key.clone(), image) {
            if evicted != key {
                trace!(key = %evicted, "Evicted least recently used image");
            }
        }
    }

    fn len(&self) -> usize {
        self.cache.lock().len()
    }

    async fn clear(&self) {
        self.cache.lock().clear();
        debug!("Cleared memory image cache");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn image(width: u32) -> AvatarImage {
        Arc::new(image::DynamicImage::new_rgb8(width, 10))
    }

    #[tokio::test]
    async fn test_cache_put_and_get() {
        let cache = MemoryImageCache::new(10);
        let key = ImageKey::from_url("https://example.com/1.png");

        cache.put(key.clone(), image(100)).await;
        let retrieved = cache.get(&key).await;

        assert_eq!(retrieved.map(|img| img.width()), Some(100));
    }

    #[tokio::test]
    async fn test_cache_miss() {
        let cache = MemoryImageCache::new(10);
        let key = ImageKey::from_url("https://example.com/missing.png");

        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let cache = MemoryImageCache::new(10);
        let key = ImageKey::from_url("https://example.com/1.png");

        cache.put(key.clone(), image(10)).await;
        cache.put(key.clone(), image(20)).await;

        assert_eq!(cache.get(&key).await.map(|img| img.width()), Some(20));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_cache_eviction() {
        let cache = MemoryImageCache::new(2);

        let key1 = ImageKey::from_url("https://example.com/1.png");
        let key2 = ImageKey::from_url("https://example.com/2.png");
        let key3 = ImageKey::from_url("https://example.com/3.png");

        cache.put(key1.clone(), image(10)).await;
        cache.put(key2.clone(), image(10)).await;
        cache.put(key3.clone(), image(10)).await;

        // key1 should be evicted (LRU)
        assert!(cache.get(&key1).await.is_none());
        assert!(cache.get(&key2).await.is_some());
        assert!(cache.get(&key3).await.is_some());
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_clear_drops_everything() {
        let cache = MemoryImageCache::new(10);
        let key = ImageKey::from_url("https://example.com/1.png");
        cache.put(key.clone(), image(10)).await;

        cache.clear().await;

        assert!(cache.is_empty());
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_stats() {
        let cache = MemoryImageCache::new(10);
        let key = ImageKey::from_url("https://example.com/1.png");

        cache.put(key.clone(), image(10)).await;

        // Hit
        let _ = cache.get(&key).await;
        // Miss
        let _ = cache.get(&ImageKey::from_url("https://example.com/2.png")).await;

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
        assert!(stats.to_string().contains("50.0% hit rate"));
    }

    #[tokio::test]
    async fn test_peek_does_not_promote() {
        let cache = MemoryImageCache::new(2);

        let key1 = ImageKey::from_url("https://example.com/1.png");
        let key2 = ImageKey::from_url("https://example.com/2.png");

        cache.put(key1.clone(), image(10)).await;
        cache.put(key2.clone(), image(10)).await;

        // Peek at key1 (should not promote it)
        let _ = cache.peek(&key1);

        cache.put(ImageKey::from_url("https://example.com/3.png"), image(10)).await;

        assert!(cache.peek(&key1).is_none());
        assert!(cache.peek(&key2).is_some());
    }

    #[tokio::test]
    async fn test_zero_capacity_is_coerced() {
        assert_eq!(MemoryImageCache::new(0).capacity(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_writers_for_distinct_keys() {
        let cache = Arc::new(MemoryImageCache::new(64));
        let mut tasks = Vec::new();
        for i in 0..32u32 {
            let cache = cache.clone();
            tasks.push(tokio::spawn(async move {
                let key = ImageKey::from_url(&format!("https://example.com/{i}.png"));
                cache.put(key.clone(), image(i + 1)).await;
                cache.get(&key).await.map(|img| img.width())
            }));
        }

        for (i, task) in tasks.into_iter().enumerate() {
            let width = task.await.expect("task panicked");
            assert_eq!(width, Some(u32::try_from(i).unwrap() + 1));
        }
        assert_eq!(cache.len(), 32);
    }
}
