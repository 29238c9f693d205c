use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lru::LruCache;

use super::fetcher::TileFetcher;
use super::types::{TileData, TileLoadFailure};
use crate::core::constants::DEFAULT_CACHE_SIZE;

/// In-memory cache of decoded tile bodies keyed by URL, using LRU eviction
#[derive(Debug)]
pub struct TileCache {
    cache: Arc<Mutex<LruCache<String, TileData>>>,
}

impl TileCache {
    /// Create a new tile cache with the given capacity
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_CACHE_SIZE))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Create a new tile cache with default capacity (1024 tiles)
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }

    pub fn get(&self, url: &str) -> Option<TileData> {
        self.cache.lock().ok()?.get(url).cloned()
    }

    pub fn insert(&self, url: String, data: TileData) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(url, data);
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.cache
            .lock()
            .ok()
            .map(|cache| cache.contains(url))
            .unwrap_or(false)
    }

    pub fn remove(&self, url: &str) -> Option<TileData> {
        self.cache.lock().ok()?.pop(url)
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().ok().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.cache
            .lock()
            .ok()
            .map(|cache| cache.cap().get())
            .unwrap_or(0)
    }
}

impl Clone for TileCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

impl Default for TileCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

/// Serves repeat loads of a URL from a [`TileCache`] and records fresh
/// successes. Failures are never cached, so a retry always reaches `inner`.
pub struct CachedFetcher {
    inner: Arc<dyn TileFetcher>,
    cache: TileCache,
}

impl CachedFetcher {
    pub fn new(inner: Arc<dyn TileFetcher>, cache: TileCache) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &TileCache {
        &self.cache
    }
}

#[async_trait]
impl TileFetcher for CachedFetcher {
    async fn fetch(&self, url: &str) -> Result<TileData, TileLoadFailure> {
        if let Some(data) = self.cache.get(url) {
            log::trace!("tile cache hit {}", url);
            return Ok(data);
        }
        let data = self.inner.fetch(url).await?;
        self.cache.insert(url.to_string(), data.clone());
        Ok(data)
    }
}
