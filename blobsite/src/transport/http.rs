//! HTTP client abstraction for testability

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;

use super::types::TransportError;

/// Default connect timeout in seconds.
///
/// The per-attempt deadline is enforced by the failover fetcher; this only
/// keeps a dead host from holding a socket open past that deadline.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Trait for async HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an HTTP GET request.
    ///
    /// Returns the response body on a 2xx status. Any other status is a
    /// [`TransportError::Status`]. Dropping the returned future abandons the
    /// in-flight request.
    fn get(&self, url: &str) -> impl Future<Output = Result<Bytes, TransportError>> + Send;
}

/// Real HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a new client with default configuration.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
    }

    /// Creates a new client with a custom connect timeout.
    pub fn with_connect_timeout(connect_timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .user_agent(concat!("blobsite/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

// Matches the trait's `impl Future + Send` signature.
#[allow(clippy::manual_async_fn)]
impl AsyncHttpClient for AsyncReqwestClient {
    fn get(&self, url: &str) -> impl Future<Output = Result<Bytes, TransportError>> + Send {
        let request = self.client.get(url);
        async move {
            let response = request
                .send()
                .await
                .map_err(|e| TransportError::Request(e.to_string()))?;

            if !response.status().is_success() {
                return Err(TransportError::Status {
                    status: response.status().as_u16(),
                });
            }

            response
                .bytes()
                .await
                .map_err(|e| TransportError::Request(format!("failed to read body: {}", e)))
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Scripted outcome for one endpoint in [`MockAsyncHttpClient`].
    #[derive(Debug, Clone)]
    pub enum MockReply {
        /// 200 with this body.
        Body(Vec<u8>),
        /// Non-success status.
        Status(u16),
        /// Transport failure.
        Fail(String),
        /// Never answers.
        Hang,
    }

    /// Mock HTTP client that answers by URL prefix and records every call.
    #[derive(Default)]
    pub struct MockAsyncHttpClient {
        replies: Vec<(String, MockReply)>,
        calls: Mutex<Vec<String>>,
    }

    impl MockAsyncHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer every URL starting with `prefix` with `reply`.
        pub fn reply(mut self, prefix: &str, reply: MockReply) -> Self {
            self.replies.push((prefix.to_string(), reply));
            self
        }

        /// URLs requested so far, in order.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    #[allow(clippy::manual_async_fn)]
    impl AsyncHttpClient for MockAsyncHttpClient {
        fn get(&self, url: &str) -> impl Future<Output = Result<Bytes, TransportError>> + Send {
            self.calls.lock().push(url.to_string());
            let reply = self
                .replies
                .iter()
                .find(|(prefix, _)| url.starts_with(prefix.as_str()))
                .map(|(_, reply)| reply.clone())
                .unwrap_or(MockReply::Status(404));

            async move {
                match reply {
                    MockReply::Body(body) => Ok(Bytes::from(body)),
                    MockReply::Status(status) => Err(TransportError::Status { status }),
                    MockReply::Fail(msg) => Err(TransportError::Request(msg)),
                    MockReply::Hang => std::future::pending().await,
                }
            }
        }
    }

    #[tokio::test]
    async fn test_mock_client_success() {
        let mock = MockAsyncHttpClient::new().reply("http://a.test", MockReply::Body(vec![1, 2, 3]));

        let result = mock.get("http://a.test/v1/blobs/x").await;
        assert_eq!(result.unwrap(), Bytes::from(vec![1, 2, 3]));
        assert_eq!(mock.calls(), vec!["http://a.test/v1/blobs/x".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_client_status_error() {
        let mock = MockAsyncHttpClient::new().reply("http://a.test", MockReply::Status(500));

        let result = mock.get("http://a.test/x").await;
        assert_eq!(result.unwrap_err(), TransportError::Status { status: 500 });
    }

    #[tokio::test]
    async fn test_mock_client_unscripted_url_is_404() {
        let mock = MockAsyncHttpClient::new();
        let result = mock.get("http://elsewhere.test/x").await;
        assert_eq!(result.unwrap_err().status(), Some(404));
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(AsyncReqwestClient::new().is_ok());
    }
}
