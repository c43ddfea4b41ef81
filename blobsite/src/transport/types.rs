//! Transport error types.

use thiserror::Error;

/// Failure of a single HTTP GET.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The endpoint answered with a non-success status.
    #[error("HTTP {status}")]
    Status { status: u16 },

    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("request failed: {0}")]
    Request(String),

    /// The client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    Client(String),
}

impl TransportError {
    /// Status code for status failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accessor() {
        assert_eq!(TransportError::Status { status: 503 }.status(), Some(503));
        assert_eq!(TransportError::Request("reset".into()).status(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(TransportError::Status { status: 500 }.to_string(), "HTTP 500");
        assert!(TransportError::Request("connection refused".into())
            .to_string()
            .contains("connection refused"));
    }
}
