//! Read-through / write-behind wrapper around an optional response cache.

use std::sync::Arc;

use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

use super::traits::{CacheError, ResponseCache, ResponseStore};
use crate::gateway::SiteResponse;

/// Optional response cache used by the gateway.
///
/// Disabled gateways turn every operation into a no-op. Enabled gateways
/// treat cache failures as misses: a broken cache never fails a request.
///
/// Writes run as tracked background tasks. There is no ordering guarantee
/// between a write and the response it snapshots already being returned;
/// [`CacheGateway::settle`] waits for all outstanding writes.
///
/// Entries are keyed by request alone (`"<METHOD> <URL>"`), not by content
/// id. Reloading the site does not invalidate them: a path remapped to new
/// content keeps serving the stored response until it expires or is evicted.
/// Open a different cache name for each deployment to serve new content.
pub struct CacheGateway {
    cache: Option<Arc<dyn ResponseCache>>,
    name: Option<String>,
    writes: TaskTracker,
}

impl CacheGateway {
    /// A gateway that never caches.
    pub fn disabled() -> Self {
        Self {
            cache: None,
            name: None,
            writes: TaskTracker::new(),
        }
    }

    /// Open the cache called `name` from `store`.
    pub async fn open(store: &dyn ResponseStore, name: &str) -> Result<Self, CacheError> {
        let cache = store.open(name).await?;
        debug!(cache = name, "Response cache opened");
        Ok(Self {
            cache: Some(cache),
            name: Some(name.to_string()),
            writes: TaskTracker::new(),
        })
    }

    /// Wrap an already-open cache.
    pub fn with_cache(cache: Arc<dyn ResponseCache>, name: impl Into<String>) -> Self {
        Self {
            cache: Some(cache),
            name: Some(name.into()),
            writes: TaskTracker::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Stored response for `key`, if any.
    pub async fn lookup(&self, key: &str) -> Option<SiteResponse> {
        let cache = self.cache.as_ref()?;
        match cache.lookup(key).await {
            Ok(hit) => {
                debug!(key, hit = hit.is_some(), "Response cache lookup");
                hit
            }
            Err(e) => {
                warn!(key, error = %e, "Response cache lookup failed, treating as miss");
                None
            }
        }
    }

    /// Store a successful response without waiting for the write.
    ///
    /// Non-2xx responses are never stored.
    pub fn persist(&self, key: String, response: SiteResponse) {
        let Some(cache) = self.cache.as_ref() else {
            return;
        };
        if !response.is_success() {
            return;
        }

        let cache = Arc::clone(cache);
        self.writes.spawn(async move {
            if let Err(e) = cache.put(&key, response).await {
                warn!(key = %key, error = %e, "Response cache write failed");
            }
        });
    }

    /// Wait until every write spawned so far has finished.
    pub async fn settle(&self) {
        self.writes.close();
        self.writes.wait().await;
        self.writes.reopen();
    }

    /// Number of writes still in flight.
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }
}

impl Default for CacheGateway {
    fn default() -> Self {
        Self::disabled()
    }
}
