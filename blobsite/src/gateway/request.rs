//! Request and response descriptors exchanged with the host runtime.

use std::fmt;

use bytes::Bytes;

use crate::mime::DEFAULT_CONTENT_TYPE;

/// HTTP status for a successful retrieval.
pub const STATUS_OK: u16 = 200;

/// HTTP status returned when every endpoint failed.
pub const STATUS_BAD_GATEWAY: u16 = 502;

const ERROR_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// An inbound request as delivered by the interception host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRequest {
    method: String,
    url: String,
}

impl SiteRequest {
    /// Creates a request descriptor. The method is upper-cased.
    pub fn new(method: impl AsRef<str>, url: impl Into<String>) -> Self {
        Self {
            method: method.as_ref().to_ascii_uppercase(),
            url: url.into(),
        }
    }

    /// Shorthand for a `GET` request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether this request may be served from blob storage at all.
    pub fn is_retrieval(&self) -> bool {
        matches!(self.method.as_str(), "GET" | "HEAD")
    }

    pub fn is_head(&self) -> bool {
        self.method == "HEAD"
    }

    /// Identity used as the response cache key.
    pub fn cache_key(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}

impl fmt::Display for SiteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// A response handed back to the host runtime; also the cached snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Bytes,
}

impl SiteResponse {
    /// 200 response with the given content type.
    pub fn ok(content_type: impl Into<String>, body: Bytes) -> Self {
        Self {
            status: STATUS_OK,
            content_type: content_type.into(),
            body,
        }
    }

    /// 502 response carrying a plain-text message.
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_BAD_GATEWAY,
            content_type: ERROR_CONTENT_TYPE.to_string(),
            body: Bytes::from(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Same response without a body, for `HEAD`.
    pub fn without_body(mut self) -> Self {
        self.body = Bytes::new();
        self
    }
}

impl Default for SiteResponse {
    fn default() -> Self {
        Self::ok(DEFAULT_CONTENT_TYPE, Bytes::new())
    }
}

/// Outcome of offering a request to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interception {
    /// Not ours; the host should handle the request itself.
    Declined,
    /// Substitute this response.
    Respond(SiteResponse),
}

impl Interception {
    pub fn is_declined(&self) -> bool {
        matches!(self, Interception::Declined)
    }

    /// The substituted response, if any.
    pub fn into_response(self) -> Option<SiteResponse> {
        match self {
            Interception::Declined => None,
            Interception::Respond(response) => Some(response),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_identity() {
        let request = SiteRequest::new("get", "https://site.test/app.js?v=2");
        assert_eq!(request.method(), "GET");
        assert_eq!(request.cache_key(), "GET https://site.test/app.js?v=2");
        assert_eq!(request.to_string(), "GET https://site.test/app.js?v=2");
    }

    #[test]
    fn test_only_get_and_head_are_retrievals() {
        assert!(SiteRequest::get("/").is_retrieval());
        assert!(SiteRequest::new("HEAD", "/").is_retrieval());
        assert!(!SiteRequest::new("POST", "/").is_retrieval());
        assert!(!SiteRequest::new("DELETE", "/").is_retrieval());
    }

    #[test]
    fn test_response_constructors() {
        let ok = SiteResponse::ok("text/css", Bytes::from_static(b"a{}"));
        assert!(ok.is_success());
        assert_eq!(ok.status, 200);

        let failed = SiteResponse::bad_gateway("all endpoints failed");
        assert!(!failed.is_success());
        assert_eq!(failed.status, 502);
        assert_eq!(failed.body, Bytes::from_static(b"all endpoints failed"));

        assert!(ok.without_body().body.is_empty());
    }

    #[test]
    fn test_interception_accessors() {
        assert!(Interception::Declined.is_declined());
        assert!(Interception::Declined.into_response().is_none());
        let response = SiteResponse::default();
        assert_eq!(
            Interception::Respond(response.clone()).into_response(),
            Some(response)
        );
    }
}
