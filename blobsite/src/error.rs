//! Validation errors raised synchronously while loading site configuration.

use thiserror::Error;

/// A malformed registry mapping or endpoint list.
///
/// Every variant names the offending value so the caller can fix the input
/// without re-reading the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The registry mapping was not a key/value object.
    #[error("resource mapping must be an object of path -> content id, got {found}")]
    MappingNotObject { found: &'static str },

    /// A registry entry had a value that is not a string.
    #[error("content id for '{path}' must be a string, got {found}")]
    ContentIdNotString { path: String, found: &'static str },

    /// A registry entry had an empty content id.
    #[error("content id for '{path}' is empty")]
    EmptyContentId { path: String },

    /// The endpoint list was given but empty.
    #[error("endpoint list must contain at least one URL")]
    NoEndpoints,

    /// An endpoint entry was not an absolute URL.
    #[error("endpoint #{index} '{url}' is not a valid absolute URL: {reason}")]
    InvalidEndpoint {
        index: usize,
        url: String,
        reason: String,
    },

    /// No endpoint list was supplied and none was configured before.
    #[error("no endpoint list configured; supply endpoints with the first load")]
    EndpointsMissing,

    /// A combined load document had an `endpoints` value that is not a list of strings.
    #[error("endpoints must be a list of URL strings, got {found}")]
    EndpointsNotList { found: &'static str },

    /// A combined load document named an unknown load mode.
    #[error("unknown load mode '{0}' (expected replace or merge)")]
    UnknownLoadMode(String),

    /// A combined load document had a `mode` value that is not a string.
    #[error("load mode must be a string, got {found}")]
    ModeNotString { found: &'static str },
}

/// Short name of a JSON value's shape, for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_messages_name_the_offender() {
        let err = ConfigError::InvalidEndpoint {
            index: 1,
            url: "not a url".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("#1"));
        assert!(msg.contains("not a url"));

        let err = ConfigError::MappingNotObject { found: "array" };
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_json_kind() {
        assert_eq!(json_kind(&json!(null)), "null");
        assert_eq!(json_kind(&json!([1])), "array");
        assert_eq!(json_kind(&json!({})), "object");
        assert_eq!(json_kind(&json!("x")), "string");
        assert_eq!(json_kind(&json!(1)), "number");
        assert_eq!(json_kind(&json!(true)), "boolean");
    }
}
