//! Failover error types.

use thiserror::Error;

/// Why one endpoint attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    /// Endpoint answered with a non-success status.
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    /// Request failed before a status was received.
    #[error("{url} failed: {message}")]
    Transport { url: String, message: String },

    /// Attempt deadline fired and the request was cancelled.
    #[error("{url} timed out after {timeout_ms}ms")]
    TimedOut { url: String, timeout_ms: u64 },
}

impl AttemptError {
    /// The full retrieval URL of the failed attempt.
    pub fn url(&self) -> &str {
        match self {
            AttemptError::Status { url, .. }
            | AttemptError::Transport { url, .. }
            | AttemptError::TimedOut { url, .. } => url,
        }
    }
}

/// Every endpoint failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetrievalError {
    /// All endpoints were tried; only the last failure is kept.
    #[error("all {attempts} endpoint(s) failed for {content_id}; last error: {last}")]
    Exhausted {
        content_id: String,
        attempts: usize,
        last: AttemptError,
    },
}

impl RetrievalError {
    /// The last attempt failure.
    pub fn last_attempt(&self) -> &AttemptError {
        match self {
            RetrievalError::Exhausted { last, .. } => last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_message_names_endpoint() {
        let err = RetrievalError::Exhausted {
            content_id: "id1".to_string(),
            attempts: 2,
            last: AttemptError::Status {
                url: "https://b.test/v1/blobs/id1".to_string(),
                status: 503,
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("https://b.test"));
        assert!(msg.contains("503"));
        assert!(msg.contains("2 endpoint"));
        assert_eq!(err.last_attempt().url(), "https://b.test/v1/blobs/id1");
    }

    #[test]
    fn test_timed_out_display() {
        let err = AttemptError::TimedOut {
            url: "https://a.test/v1/blobs/x".to_string(),
            timeout_ms: 5000,
        };
        assert_eq!(err.to_string(), "https://a.test/v1/blobs/x timed out after 5000ms");
    }
}
