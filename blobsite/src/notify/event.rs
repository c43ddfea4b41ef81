//! Notification payloads.

use serde::{Deserialize, Serialize};

/// An event broadcast to observers.
///
/// Serializes as `{"kind":"loading","path":…}`, `{"kind":"success"}` or
/// `{"kind":"error","message":…}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SiteEvent {
    /// A registered resource started resolving.
    Loading { path: String },
    /// First successful fetch since the last load.
    Success,
    /// A request exhausted every endpoint.
    Error { message: String },
}

impl SiteEvent {
    pub fn loading(path: impl Into<String>) -> Self {
        SiteEvent::Loading { path: path.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        SiteEvent::Error {
            message: message.into(),
        }
    }

    /// The `kind` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            SiteEvent::Loading { .. } => "loading",
            SiteEvent::Success => "success",
            SiteEvent::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_shapes() {
        assert_eq!(
            serde_json::to_value(SiteEvent::loading("/index.html")).unwrap(),
            json!({"kind": "loading", "path": "/index.html"})
        );
        assert_eq!(
            serde_json::to_value(SiteEvent::Success).unwrap(),
            json!({"kind": "success"})
        );
        assert_eq!(
            serde_json::to_value(SiteEvent::error("boom")).unwrap(),
            json!({"kind": "error", "message": "boom"})
        );
    }

    #[test]
    fn test_parse_from_payload() {
        let event: SiteEvent = serde_json::from_str(r#"{"kind":"success"}"#).unwrap();
        assert_eq!(event, SiteEvent::Success);
        assert_eq!(event.kind(), "success");
    }
}
