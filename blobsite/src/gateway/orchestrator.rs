//! The request-handling facade.
//!
//! # Request lifecycle
//!
//! ```text
//! Uninitialized ──load──► Ready
//!
//! Ready, per request:
//!   Lookup ──not registered──► Declined
//!     │
//!   CacheCheck ──hit──► Respond(stored)
//!     │ miss / disabled
//!   Fetching (LOADING) ──► Success: MIME tag, cache write, SUCCESS once per generation
//!                      └─► Failure: ERROR, 502
//! ```
//!
//! # Concurrency
//!
//! Each request takes an `Arc` snapshot of the registry and endpoint list
//! when it starts, so a concurrent `load` never changes a request mid-flight;
//! requests that started before the swap finish against the old state. The
//! success flag is reset inside the same critical section as the swap, but a
//! request from the previous generation that completes right after a `load`
//! can still consume the new generation's announcement. Both outcomes are
//! accepted.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error, info, instrument, warn};

use super::config::GatewayConfig;
use super::error::GatewayError;
use super::load::LoadRequest;
use super::request::{Interception, SiteRequest, SiteResponse};
use crate::cache::{CacheGateway, ResponseStore};
use crate::endpoint::EndpointList;
use crate::error::ConfigError;
use crate::fetch::{FailoverFetcher, RetrievalError};
use crate::mime;
use crate::notify::{NotificationBus, ObserverSource};
use crate::path::normalize;
use crate::registry::{LoadMode, ResourceRegistry};
use crate::transport::AsyncHttpClient;

/// Registry and endpoints as of one load.
#[derive(Debug)]
struct SiteSnapshot {
    registry: ResourceRegistry,
    endpoints: EndpointList,
}

#[derive(Debug, Default)]
struct GatewayState {
    /// Endpoints used when a load does not supply its own.
    endpoints: Option<EndpointList>,
    /// `None` until the first successful load.
    snapshot: Option<Arc<SiteSnapshot>>,
}

/// Result of a successful [`SiteGateway::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    /// Entries in the loaded mapping.
    pub loaded: usize,
    /// Entries in the registry after the load.
    pub registered: usize,
    /// Endpoints in effect after the load.
    pub endpoints: usize,
    pub mode: LoadMode,
}

/// Point-in-time view of the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayStatus {
    pub ready: bool,
    pub resources: usize,
    pub endpoints: Vec<String>,
    pub success_announced: bool,
    pub cache: Option<String>,
}

/// Resolves site requests against blob storage.
///
/// Owns its registry, endpoint list and success flag; any number of
/// independent gateways can coexist. Capabilities (transport, observers,
/// response store) are injected at construction.
///
/// # Caching
///
/// With a cache configured, a stored response wins over the registry. A
/// [`load`](Self::load) that maps a path to new content does not touch the
/// cache, so the old bytes keep being served for that request. Deploy new
/// content under a new cache name (`[cache] name` in `config.ini`).
///
/// # Example
///
/// ```ignore
/// use blobsite::gateway::{LoadRequest, SiteGateway, SiteRequest};
/// use blobsite::transport::AsyncReqwestClient;
///
/// let gateway = SiteGateway::new(AsyncReqwestClient::new()?);
/// gateway.load(
///     LoadRequest::new(serde_json::json!({"/index.html": "id1"}))
///         .with_endpoints(["https://aggregator.test"]),
/// )?;
/// let outcome = gateway.handle(&SiteRequest::get("https://site.test/")).await?;
/// ```
pub struct SiteGateway<C: AsyncHttpClient> {
    fetcher: FailoverFetcher<C>,
    state: RwLock<GatewayState>,
    bus: NotificationBus,
    cache: CacheGateway,
}

impl<C: AsyncHttpClient> SiteGateway<C> {
    /// A gateway with default settings, no observers and no cache.
    pub fn new(client: C) -> Self {
        Self::from_parts(
            client,
            &GatewayConfig::default(),
            None,
            NotificationBus::silent(),
            CacheGateway::disabled(),
        )
    }

    /// Start building a gateway around `client`.
    pub fn builder(client: C) -> SiteGatewayBuilder<C> {
        SiteGatewayBuilder::new(client)
    }

    fn from_parts(
        client: C,
        config: &GatewayConfig,
        endpoints: Option<EndpointList>,
        bus: NotificationBus,
        cache: CacheGateway,
    ) -> Self {
        let fetcher = FailoverFetcher::new(client)
            .with_attempt_timeout(config.attempt_timeout)
            .with_blob_path(&config.blob_path);

        Self {
            fetcher,
            state: RwLock::new(GatewayState {
                endpoints,
                snapshot: None,
            }),
            bus,
            cache,
        }
    }

    /// Install a registry mapping and, optionally, a new endpoint list.
    ///
    /// Everything is validated before any state changes; on error the
    /// gateway keeps its previous registry, endpoints and readiness. A
    /// successful load starts a new generation.
    pub fn load(&self, request: LoadRequest) -> Result<LoadSummary, GatewayError> {
        let mut state = self.state.write();

        let endpoints = match request.endpoints() {
            Some(urls) => EndpointList::load(urls)?,
            None => state
                .endpoints
                .clone()
                .ok_or(ConfigError::EndpointsMissing)?,
        };

        let mut registry = match (request.mode(), &state.snapshot) {
            (LoadMode::Merge, Some(current)) => current.registry.clone(),
            _ => ResourceRegistry::new(),
        };
        let loaded = registry.load(request.resources(), request.mode())?;

        let summary = LoadSummary {
            loaded,
            registered: registry.len(),
            endpoints: endpoints.len(),
            mode: request.mode(),
        };

        state.endpoints = Some(endpoints.clone());
        state.snapshot = Some(Arc::new(SiteSnapshot {
            registry,
            endpoints,
        }));
        self.bus.reset_generation();
        drop(state);

        info!(
            loaded = summary.loaded,
            registered = summary.registered,
            endpoints = summary.endpoints,
            mode = %summary.mode,
            "Site loaded"
        );
        Ok(summary)
    }

    fn snapshot(&self) -> Option<Arc<SiteSnapshot>> {
        self.state.read().snapshot.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.state.read().snapshot.is_some()
    }

    /// Whether `handle` would serve this request rather than decline it.
    ///
    /// Always `false` before the first load.
    pub fn claims(&self, request: &SiteRequest) -> bool {
        if !request.is_retrieval() {
            return false;
        }
        self.snapshot()
            .map(|s| s.registry.has(&normalize(request.url())))
            .unwrap_or(false)
    }

    /// Offer an intercepted request to the gateway.
    ///
    /// Requests for unregistered paths, and anything but `GET`/`HEAD`, are
    /// declined with no side effects. Retrieval failures become a 502
    /// response rather than an error.
    #[instrument(skip(self, request), fields(method = request.method(), url = request.url()))]
    pub async fn handle(&self, request: &SiteRequest) -> Result<Interception, GatewayError> {
        if !request.is_retrieval() {
            return Ok(Interception::Declined);
        }

        let snapshot = self.snapshot().ok_or(GatewayError::NotInitialized)?;
        let path = normalize(request.url());
        let Some(content_id) = snapshot.registry.get(&path) else {
            debug!(path = %path, "Not registered, declining");
            return Ok(Interception::Declined);
        };

        let key = request.cache_key();
        if let Some(stored) = self.cache.lookup(&key).await {
            debug!(path = %path, "Served from response cache");
            return Ok(Interception::Respond(stored));
        }

        match self.fetch_resource(&path, content_id, &snapshot.endpoints).await {
            Ok(response) => {
                let response = if request.is_head() {
                    response.without_body()
                } else {
                    response
                };
                self.cache.persist(key, response.clone());
                self.bus.success();
                Ok(Interception::Respond(response))
            }
            Err(e) => Ok(Interception::Respond(SiteResponse::bad_gateway(e.to_string()))),
        }
    }

    /// Look a path up directly, outside of request interception.
    ///
    /// Unlike [`handle`](Self::handle), an unregistered path and exhausted
    /// retrieval are errors. The response cache is not consulted.
    pub async fn resolve(&self, path: &str) -> Result<SiteResponse, GatewayError> {
        let snapshot = self.snapshot().ok_or(GatewayError::NotInitialized)?;
        let path = normalize(path);
        let Some(content_id) = snapshot.registry.get(&path) else {
            return Err(GatewayError::ResourceNotRegistered { path });
        };

        match self.fetch_resource(&path, content_id, &snapshot.endpoints).await {
            Ok(response) => {
                self.bus.success();
                Ok(response)
            }
            Err(source) => Err(GatewayError::RetrievalExhausted { path, source }),
        }
    }

    /// Fetch and tag a registered resource, emitting LOADING and ERROR.
    async fn fetch_resource(
        &self,
        path: &str,
        content_id: &str,
        endpoints: &EndpointList,
    ) -> Result<SiteResponse, RetrievalError> {
        self.bus.loading(path);

        match self.fetcher.fetch(content_id, endpoints).await {
            Ok(body) => Ok(SiteResponse::ok(mime::resolve(path), body)),
            Err(e) => {
                error!(path, content_id, error = %e, "All endpoints failed");
                self.bus.error(e.to_string());
                Err(e)
            }
        }
    }

    /// Current readiness, sizes and generation state.
    pub fn status(&self) -> GatewayStatus {
        let state = self.state.read();
        let endpoints = state
            .snapshot
            .as_ref()
            .map(|s| &s.endpoints)
            .or(state.endpoints.as_ref())
            .map(|list| list.as_slice().to_vec())
            .unwrap_or_default();

        GatewayStatus {
            ready: state.snapshot.is_some(),
            resources: state.snapshot.as_ref().map_or(0, |s| s.registry.len()),
            endpoints,
            success_announced: self.bus.success_announced(),
            cache: self.cache.name().map(str::to_string),
        }
    }

    /// Wait for outstanding background cache writes.
    pub async fn settle(&self) {
        self.cache.settle().await;
    }

    /// Cache writes spawned but not yet finished.
    pub fn pending_writes(&self) -> usize {
        self.cache.pending_writes()
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_enabled()
    }

    /// The transport client, mainly for inspection in tests.
    pub fn client(&self) -> &C {
        self.fetcher.client()
    }
}

/// Builder for [`SiteGateway`].
pub struct SiteGatewayBuilder<C: AsyncHttpClient> {
    client: C,
    config: GatewayConfig,
    observers: Option<Arc<dyn ObserverSource>>,
    store: Option<Arc<dyn ResponseStore>>,
    endpoints: Option<Vec<String>>,
}

impl<C: AsyncHttpClient> SiteGatewayBuilder<C> {
    fn new(client: C) -> Self {
        Self {
            client,
            config: GatewayConfig::default(),
            observers: None,
            store: None,
            endpoints: None,
        }
    }

    pub fn config(mut self, config: GatewayConfig) -> Self {
        self.config = config;
        self
    }

    /// Where to find observers for lifecycle events.
    pub fn observers(mut self, source: Arc<dyn ObserverSource>) -> Self {
        self.observers = Some(source);
        self
    }

    /// Store to open the configured response cache from.
    pub fn response_store(mut self, store: Arc<dyn ResponseStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Endpoints used by loads that do not carry their own.
    pub fn endpoints<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints = Some(urls.into_iter().map(Into::into).collect());
        self
    }

    /// Validate the construction-time endpoints and open the cache.
    ///
    /// A cache that cannot be opened is logged and left disabled; caching
    /// never prevents the gateway from serving.
    pub async fn build(self) -> Result<SiteGateway<C>, GatewayError> {
        let endpoints = self
            .endpoints
            .map(EndpointList::load)
            .transpose()?;

        let cache = match (&self.config.cache_name, &self.store) {
            (Some(name), Some(store)) => match CacheGateway::open(store.as_ref(), name).await {
                Ok(cache) => cache,
                Err(e) => {
                    warn!(cache = %name, error = %e, "Response cache unavailable, caching disabled");
                    CacheGateway::disabled()
                }
            },
            (Some(name), None) => {
                warn!(cache = %name, "No response store provided, caching disabled");
                CacheGateway::disabled()
            }
            _ => CacheGateway::disabled(),
        };

        let bus = self
            .observers
            .map(NotificationBus::new)
            .unwrap_or_else(NotificationBus::silent);

        Ok(SiteGateway::from_parts(
            self.client,
            &self.config,
            endpoints,
            bus,
            cache,
        ))
    }
}
