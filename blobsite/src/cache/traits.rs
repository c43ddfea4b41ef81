//! Capability traits for the host's persistent response cache.
//!
//! The gateway never looks a cache up by itself: a [`ResponseStore`] is
//! injected at construction and asked to `open` a named [`ResponseCache`].
//! Both traits use `Pin<Box<dyn Future>>` so they can be held as trait
//! objects (`Arc<dyn ResponseCache>`).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

use crate::gateway::SiteResponse;

/// Errors that can occur during cache operations.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// The named cache could not be opened.
    #[error("Cache '{name}' is unavailable: {reason}")]
    Unavailable { name: String, reason: String },

    /// Provider-specific error.
    #[error("Provider error: {0}")]
    Provider(String),
}

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A named cache of response snapshots keyed by request identity.
pub trait ResponseCache: Send + Sync {
    /// Look up a stored response (the host's `match`).
    ///
    /// - `Ok(Some(response))` on a hit
    /// - `Ok(None)` on a miss
    fn lookup(&self, key: &str) -> BoxFuture<'_, Result<Option<SiteResponse>, CacheError>>;

    /// Store a response, replacing any previous snapshot for `key`.
    fn put(&self, key: &str, response: SiteResponse) -> BoxFuture<'_, Result<(), CacheError>>;
}

/// Opens named response caches.
pub trait ResponseStore: Send + Sync {
    /// Open (creating if needed) the cache called `name`.
    fn open(&self, name: &str) -> BoxFuture<'_, Result<Arc<dyn ResponseCache>, CacheError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_error_display() {
        let err = CacheError::Unavailable {
            name: "site-v1".to_string(),
            reason: "quota exceeded".to_string(),
        };
        assert!(err.to_string().contains("site-v1"));
        assert!(err.to_string().contains("quota exceeded"));

        let err = CacheError::Provider("disk full".to_string());
        assert_eq!(err.to_string(), "Provider error: disk full");
    }
}
