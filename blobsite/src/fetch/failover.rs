//! Sequential failover fetcher.

use std::time::{Duration, Instant};

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::error::{AttemptError, RetrievalError};
use crate::endpoint::EndpointList;
use crate::transport::{AsyncHttpClient, TransportError};

/// Per-attempt deadline.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);

/// Path template between endpoint base and content id.
pub const DEFAULT_BLOB_PATH: &str = "/v1/blobs/";

/// Fetches a blob by trying endpoints strictly one after another.
///
/// Endpoints are never raced: a slow but healthy high-priority endpoint
/// always wins over a fast lower-priority one, and no later endpoint is
/// contacted once one has succeeded.
pub struct FailoverFetcher<C: AsyncHttpClient> {
    client: C,
    attempt_timeout: Duration,
    blob_path: String,
}

impl<C: AsyncHttpClient> FailoverFetcher<C> {
    /// Creates a fetcher with the default timeout and blob path.
    pub fn new(client: C) -> Self {
        Self {
            client,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            blob_path: DEFAULT_BLOB_PATH.to_string(),
        }
    }

    /// Set the per-attempt deadline.
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Set the path template inserted between endpoint and content id.
    ///
    /// Leading and trailing `/` are added if missing.
    pub fn with_blob_path(mut self, path: impl AsRef<str>) -> Self {
        let trimmed = path.as_ref().trim_matches('/');
        self.blob_path = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", trimmed)
        };
        self
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Retrieval URL for a content id on one endpoint.
    pub fn blob_url(&self, endpoint: &str, content_id: &str) -> String {
        format!("{}{}{}", endpoint, self.blob_path, content_id)
    }

    /// Fetches `content_id`, returning the first successful body.
    ///
    /// If every endpoint fails, the error carries only the last failure.
    #[instrument(skip(self, endpoints), fields(endpoints = endpoints.len()))]
    pub async fn fetch(
        &self,
        content_id: &str,
        endpoints: &EndpointList,
    ) -> Result<Bytes, RetrievalError> {
        let mut last_error = None;

        for (attempt, endpoint) in endpoints.iter().enumerate() {
            let url = self.blob_url(endpoint, content_id);
            debug!(attempt, url = %url, "Trying endpoint");

            let started = Instant::now();
            match self.attempt(&url).await {
                Ok(body) => {
                    debug!(
                        attempt,
                        url = %url,
                        size_bytes = body.len(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Endpoint succeeded"
                    );
                    return Ok(body);
                }
                Err(e) => {
                    warn!(
                        attempt,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        error = %e,
                        "Endpoint failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        // EndpointList is never empty, so at least one attempt was recorded.
        let last = last_error.unwrap_or_else(|| AttemptError::Transport {
            url: self.blob_url("", content_id),
            message: "no endpoints configured".to_string(),
        });

        Err(RetrievalError::Exhausted {
            content_id: content_id.to_string(),
            attempts: endpoints.len(),
            last,
        })
    }

    /// One bounded attempt against a single URL.
    ///
    /// A deadline task cancels the attempt token when the timeout elapses;
    /// the in-flight request future is dropped at that point.
    async fn attempt(&self, url: &str) -> Result<Bytes, AttemptError> {
        let cancel = CancellationToken::new();
        let deadline = {
            let cancel = cancel.clone();
            let timeout = self.attempt_timeout;
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                cancel.cancel();
            })
        };

        let outcome = tokio::select! {
            result = self.client.get(url) => Some(result),
            _ = cancel.cancelled() => None,
        };
        deadline.abort();

        match outcome {
            Some(Ok(body)) => Ok(body),
            Some(Err(TransportError::Status { status })) => Err(AttemptError::Status {
                url: url.to_string(),
                status,
            }),
            Some(Err(e)) => Err(AttemptError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            }),
            None => Err(AttemptError::TimedOut {
                url: url.to_string(),
                timeout_ms: self.attempt_timeout.as_millis() as u64,
            }),
        }
    }
}
