//! In-memory response store using moka.
//!
//! Each named cache wraps a `moka::future::Cache` weighted by body size, so
//! the configured limit bounds the bytes held rather than the entry count.
//! Opening the same name twice returns the same cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use parking_lot::Mutex;

use super::traits::{BoxFuture, CacheError, ResponseCache, ResponseStore};
use crate::gateway::SiteResponse;

/// Default per-cache size limit (256 MB).
pub const DEFAULT_MEMORY_CACHE_SIZE: u64 = 256 * 1024 * 1024;

/// One named in-memory response cache.
pub struct MemoryResponseCache {
    cache: MokaCache<String, SiteResponse>,
    max_size_bytes: u64,
}

impl MemoryResponseCache {
    /// Create a new cache.
    ///
    /// # Arguments
    ///
    /// * `max_size_bytes` - Maximum total weight (key + content type + body bytes)
    /// * `ttl` - Optional time-to-live for entries
    pub fn new(max_size_bytes: u64, ttl: Option<Duration>) -> Self {
        let mut builder = MokaCache::builder()
            .weigher(|key: &String, value: &SiteResponse| -> u32 {
                let weight = key.len() + value.content_type.len() + value.body.len();
                // moka uses u32 weights
                weight.min(u32::MAX as usize) as u32
            })
            .max_capacity(max_size_bytes);

        if let Some(ttl) = ttl {
            builder = builder.time_to_live(ttl);
        }

        Self {
            cache: builder.build(),
            max_size_bytes,
        }
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn size_bytes(&self) -> u64 {
        self.cache.weighted_size()
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Run pending eviction work so the counters above are current.
    pub async fn sync(&self) {
        self.cache.run_pending_tasks().await;
    }
}

impl ResponseCache for MemoryResponseCache {
    fn lookup(&self, key: &str) -> BoxFuture<'_, Result<Option<SiteResponse>, CacheError>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.cache.get(&key).await) })
    }

    fn put(&self, key: &str, response: SiteResponse) -> BoxFuture<'_, Result<(), CacheError>> {
        let key = key.to_string();
        Box::pin(async move {
            self.cache.insert(key, response).await;
            Ok(())
        })
    }
}

/// Store handing out [`MemoryResponseCache`]s by name.
///
/// Blank names are refused with [`CacheError::Unavailable`].
pub struct MemoryResponseStore {
    caches: Mutex<HashMap<String, Arc<MemoryResponseCache>>>,
    max_size_bytes: u64,
    ttl: Option<Duration>,
}

impl MemoryResponseStore {
    /// Create a store whose caches each hold up to `max_size_bytes`.
    pub fn new(max_size_bytes: u64) -> Self {
        Self {
            caches: Mutex::new(HashMap::new()),
            max_size_bytes,
            ttl: None,
        }
    }

    /// Expire entries `ttl` after they were stored. Applies to caches opened
    /// after this call.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// The concrete cache for `name`, creating it if needed.
    pub fn cache(&self, name: &str) -> Arc<MemoryResponseCache> {
        let mut caches = self.caches.lock();
        Arc::clone(
            caches
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(MemoryResponseCache::new(self.max_size_bytes, self.ttl))),
        )
    }

    /// Names of caches opened so far.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.caches.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for MemoryResponseStore {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_CACHE_SIZE)
    }
}

impl ResponseStore for MemoryResponseStore {
    fn open(&self, name: &str) -> BoxFuture<'_, Result<Arc<dyn ResponseCache>, CacheError>> {
        let result = if name.trim().is_empty() {
            Err(CacheError::Unavailable {
                name: name.to_string(),
                reason: "cache name is blank".to_string(),
            })
        } else {
            let cache: Arc<dyn ResponseCache> = self.cache(name);
            Ok(cache)
        };
        Box::pin(async move { result })
    }
}
