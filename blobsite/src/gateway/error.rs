//! Gateway error taxonomy.

use thiserror::Error;

use crate::error::ConfigError;
use crate::fetch::RetrievalError;

/// Errors surfaced by [`SiteGateway`](super::SiteGateway).
///
/// None of these poison the gateway: each request's outcome is isolated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// A request or lookup arrived before the first successful load.
    #[error("gateway not initialized: load resources and endpoints first")]
    NotInitialized,

    /// `load` rejected its input. The gateway state is unchanged.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    /// Direct lookup of a path that is not in the registry.
    #[error("resource not registered: {path}")]
    ResourceNotRegistered { path: String },

    /// Every endpoint failed for a registered resource.
    #[error("retrieval failed for {path}: {source}")]
    RetrievalExhausted {
        path: String,
        #[source]
        source: RetrievalError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::AttemptError;

    #[test]
    fn test_from_config_error() {
        let err: GatewayError = ConfigError::NoEndpoints.into();
        assert!(matches!(err, GatewayError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("at least one URL"));
    }

    #[test]
    fn test_not_registered_names_path() {
        let err = GatewayError::ResourceNotRegistered {
            path: "/missing.css".to_string(),
        };
        assert!(err.to_string().contains("/missing.css"));
    }

    #[test]
    fn test_exhausted_keeps_source() {
        use std::error::Error;

        let err = GatewayError::RetrievalExhausted {
            path: "/index.html".to_string(),
            source: RetrievalError::Exhausted {
                content_id: "id1".to_string(),
                attempts: 1,
                last: AttemptError::Status {
                    url: "https://a.test/v1/blobs/id1".to_string(),
                    status: 500,
                },
            },
        };
        assert!(err.to_string().contains("https://a.test"));
        assert!(err.source().is_some());
    }
}
