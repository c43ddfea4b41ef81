//! Ordered retrieval endpoints.
//!
//! List order is failover priority: the first endpoint is always tried first.

use url::Url;

use crate::error::ConfigError;

/// Validated, priority-ordered endpoint base URLs.
///
/// Never empty once constructed. Each base has had one trailing `/` removed
/// so that joining with the blob path template never doubles the separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointList {
    urls: Vec<String>,
}

impl EndpointList {
    /// Validates and builds an endpoint list.
    ///
    /// Rejects an empty sequence, and any entry that is not an absolute URL
    /// usable as a base. The error names the first offending entry.
    pub fn load<I, S>(urls: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut accepted = Vec::new();

        for (index, raw) in urls.into_iter().enumerate() {
            let raw = raw.as_ref().trim();
            let parsed = Url::parse(raw).map_err(|e| ConfigError::InvalidEndpoint {
                index,
                url: raw.to_string(),
                reason: e.to_string(),
            })?;

            if parsed.cannot_be_a_base() {
                return Err(ConfigError::InvalidEndpoint {
                    index,
                    url: raw.to_string(),
                    reason: "URL cannot be used as a base".to_string(),
                });
            }

            let base = raw.strip_suffix('/').unwrap_or(raw);
            accepted.push(base.to_string());
        }

        if accepted.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }

        Ok(Self { urls: accepted })
    }

    /// Endpoint bases in priority order.
    pub fn as_slice(&self) -> &[String] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }
}
