//! HTTP transport abstraction.
//!
//! The failover fetcher talks to retrieval endpoints only through the
//! [`AsyncHttpClient`] trait, so tests can substitute a scripted client.
//!
//! ```ignore
//! use blobsite::transport::AsyncReqwestClient;
//!
//! let client = AsyncReqwestClient::new()?;
//! let body = client.get("https://aggregator.test/v1/blobs/abc").await?;
//! ```

mod http;
mod types;

pub use http::{AsyncHttpClient, AsyncReqwestClient};
pub use types::TransportError;

#[cfg(test)]
pub use http::tests::{MockAsyncHttpClient, MockReply};
