//! Runtime settings for a [`SiteGateway`](super::SiteGateway).

use std::time::Duration;

use crate::fetch::{DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_BLOB_PATH};

/// Gateway settings that are fixed for the gateway's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Deadline for a single endpoint attempt.
    pub attempt_timeout: Duration,

    /// Path template between endpoint base and content id.
    pub blob_path: String,

    /// Name of the response cache to open. `None` disables caching.
    pub cache_name: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            blob_path: DEFAULT_BLOB_PATH.to_string(),
            cache_name: None,
        }
    }
}

impl GatewayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-attempt timeout.
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Set the blob path template.
    pub fn with_blob_path(mut self, path: impl Into<String>) -> Self {
        self.blob_path = path.into();
        self
    }

    /// Enable caching under the given cache name.
    ///
    /// An empty name leaves caching disabled.
    pub fn with_cache_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.cache_name = if name.trim().is_empty() {
            None
        } else {
            Some(name)
        };
        self
    }
}
