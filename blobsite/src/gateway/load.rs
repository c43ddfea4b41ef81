//! The single `load` contract.
//!
//! A [`LoadRequest`] carries the registry mapping, an optional replacement
//! endpoint list, and whether the mapping replaces or merges into the
//! existing registry.
//!
//! ```
//! use blobsite::gateway::LoadRequest;
//! use blobsite::registry::LoadMode;
//! use serde_json::json;
//!
//! let request = LoadRequest::new(json!({"/index.html": "id1"}))
//!     .with_endpoints(["https://aggregator.test"])
//!     .with_mode(LoadMode::Merge);
//! assert_eq!(request.mode(), LoadMode::Merge);
//! ```

use serde_json::{Map, Value};

use crate::error::{json_kind, ConfigError};
use crate::registry::LoadMode;

const RESOURCES_KEY: &str = "resources";
const ENDPOINTS_KEY: &str = "endpoints";
const MODE_KEY: &str = "mode";

/// Input to [`SiteGateway::load`](super::SiteGateway::load).
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    resources: Value,
    endpoints: Option<Vec<String>>,
    mode: LoadMode,
}

impl LoadRequest {
    /// A request with an untyped resource mapping, no endpoint change, and
    /// [`LoadMode::Replace`].
    ///
    /// The mapping is validated by `load`, not here.
    pub fn new(resources: Value) -> Self {
        Self {
            resources,
            endpoints: None,
            mode: LoadMode::default(),
        }
    }

    /// A request built from typed `(path, content_id)` pairs.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: Map<String, Value> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect();
        Self::new(Value::Object(map))
    }

    /// Parse a manifest document.
    ///
    /// Two shapes are accepted:
    ///
    /// - combined: `{"resources": {…}, "endpoints": [...], "mode": "merge"}`
    ///   where `endpoints` and `mode` are optional;
    /// - bare: the whole document is the resource mapping.
    ///
    /// A document is treated as combined only if `resources` holds an object
    /// and no keys other than the three above are present.
    pub fn from_document(document: Value) -> Result<Self, ConfigError> {
        Self::from_document_or(document, LoadMode::default())
    }

    /// Like [`from_document`](Self::from_document), using `default_mode`
    /// unless the document is combined and names its own mode.
    pub fn from_document_or(document: Value, default_mode: LoadMode) -> Result<Self, ConfigError> {
        let mut object = match document {
            Value::Object(object) if is_combined(&object) => object,
            other => return Ok(Self::new(other).with_mode(default_mode)),
        };

        let resources = object.remove(RESOURCES_KEY).unwrap_or(Value::Null);
        let mut request = Self::new(resources).with_mode(default_mode);

        if let Some(endpoints) = object.remove(ENDPOINTS_KEY) {
            request.endpoints = Some(parse_endpoints(&endpoints)?);
        }

        if let Some(mode) = object.remove(MODE_KEY) {
            request.mode = match mode {
                Value::String(name) => name
                    .parse()
                    .map_err(|_| ConfigError::UnknownLoadMode(name))?,
                other => {
                    return Err(ConfigError::ModeNotString {
                        found: json_kind(&other),
                    })
                }
            };
        }

        Ok(request)
    }

    /// Replace the endpoint list as part of this load.
    pub fn with_endpoints<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints = Some(urls.into_iter().map(Into::into).collect());
        self
    }

    /// Set how the mapping combines with the existing registry.
    pub fn with_mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn resources(&self) -> &Value {
        &self.resources
    }

    pub fn endpoints(&self) -> Option<&[String]> {
        self.endpoints.as_deref()
    }

    pub fn mode(&self) -> LoadMode {
        self.mode
    }
}

fn is_combined(object: &Map<String, Value>) -> bool {
    matches!(object.get(RESOURCES_KEY), Some(Value::Object(_)))
        && object
            .keys()
            .all(|k| k == RESOURCES_KEY || k == ENDPOINTS_KEY || k == MODE_KEY)
}

fn parse_endpoints(value: &Value) -> Result<Vec<String>, ConfigError> {
    let Value::Array(items) = value else {
        return Err(ConfigError::EndpointsNotList {
            found: json_kind(value),
        });
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(url) => Ok(url.clone()),
            other => Err(ConfigError::EndpointsNotList {
                found: json_kind(other),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let request = LoadRequest::new(json!({"/a": "1"}));
        assert_eq!(request.mode(), LoadMode::Replace);
        assert!(request.endpoints().is_none());
    }

    #[test]
    fn test_from_entries() {
        let request = LoadRequest::from_entries([("/a.html", "1"), ("/b.css", "2")]);
        assert_eq!(request.resources(), &json!({"/a.html": "1", "/b.css": "2"}));
    }

    #[test]
    fn test_bare_document() {
        let request = LoadRequest::from_document(json!({"/index.html": "id1"})).unwrap();
        assert_eq!(request.resources(), &json!({"/index.html": "id1"}));
        assert!(request.endpoints().is_none());
    }

    #[test]
    fn test_combined_document() {
        let request = LoadRequest::from_document(json!({
            "resources": {"/index.html": "id1"},
            "endpoints": ["https://a.test", "https://b.test"],
            "mode": "merge",
        }))
        .unwrap();

        assert_eq!(request.resources(), &json!({"/index.html": "id1"}));
        assert_eq!(
            request.endpoints(),
            Some(&["https://a.test".to_string(), "https://b.test".to_string()][..])
        );
        assert_eq!(request.mode(), LoadMode::Merge);
    }

    #[test]
    fn test_registry_with_resources_path_is_bare() {
        // A site that really has a "resources" page alongside other pages.
        let document = json!({"resources": {"x": "y"}, "/index.html": "id1"});
        let request = LoadRequest::from_document(document.clone()).unwrap();
        assert_eq!(request.resources(), &document);
    }

    #[test]
    fn test_combined_document_errors() {
        let err = LoadRequest::from_document(json!({
            "resources": {},
            "endpoints": "https://a.test",
        }))
        .unwrap_err();
        assert_eq!(err, ConfigError::EndpointsNotList { found: "string" });

        let err = LoadRequest::from_document(json!({
            "resources": {},
            "endpoints": ["https://a.test", 7],
        }))
        .unwrap_err();
        assert_eq!(err, ConfigError::EndpointsNotList { found: "number" });

        let err = LoadRequest::from_document(json!({
            "resources": {},
            "mode": "append",
        }))
        .unwrap_err();
        assert_eq!(err, ConfigError::UnknownLoadMode("append".to_string()));
    }

    #[test]
    fn test_non_string_mode_names_its_kind() {
        let err = LoadRequest::from_document(json!({
            "resources": {},
            "mode": 3,
        }))
        .unwrap_err();
        assert_eq!(err, ConfigError::ModeNotString { found: "number" });
        assert_eq!(err.to_string(), "load mode must be a string, got number");

        let err = LoadRequest::from_document(json!({
            "resources": {},
            "mode": null,
        }))
        .unwrap_err();
        assert_eq!(err, ConfigError::ModeNotString { found: "null" });
    }

    #[test]
    fn test_default_mode_applies_unless_named() {
        let request =
            LoadRequest::from_document_or(json!({"/mode": "id"}), LoadMode::Merge).unwrap();
        assert_eq!(request.mode(), LoadMode::Merge);

        let request = LoadRequest::from_document_or(
            json!({"resources": {"/a": "1"}, "mode": "replace"}),
            LoadMode::Merge,
        )
        .unwrap();
        assert_eq!(request.mode(), LoadMode::Replace);
    }

    #[test]
    fn test_non_object_document_is_passed_through() {
        // Validation is load's job; the request keeps the value as-is.
        let request = LoadRequest::from_document(json!([1, 2])).unwrap();
        assert_eq!(request.resources(), &json!([1, 2]));
    }
}
