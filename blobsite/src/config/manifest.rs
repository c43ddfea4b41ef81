//! Site manifests: JSON documents describing the registry to load.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use super::error::ConfigFileError;
use crate::gateway::LoadRequest;
use crate::registry::LoadMode;

/// Read a manifest file into a [`LoadRequest`].
///
/// Both the bare and the combined document shapes are accepted (see
/// [`LoadRequest::from_document`]). `default_mode` applies unless a combined
/// document names its own mode.
pub fn load_manifest(path: &Path, default_mode: LoadMode) -> Result<LoadRequest, ConfigFileError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let document: Value =
        serde_json::from_str(&text).map_err(|e| ConfigFileError::ManifestSyntax {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let request = LoadRequest::from_document_or(document, default_mode).map_err(|source| {
        ConfigFileError::ManifestContent {
            path: path.to_path_buf(),
            source,
        }
    })?;

    debug!(
        path = %path.display(),
        mode = %request.mode(),
        endpoints = request.endpoints().map_or(0, <[String]>::len),
        "Manifest parsed"
    );
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("site.json");
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_bare_manifest() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, r#"{"/index.html": "id1", "/app.js": "id2"}"#);

        let request = load_manifest(&path, LoadMode::Replace).unwrap();
        assert_eq!(
            request.resources(),
            &json!({"/index.html": "id1", "/app.js": "id2"})
        );
        assert!(request.endpoints().is_none());
    }

    #[test]
    fn test_combined_manifest() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            r#"{"resources": {"/": "root"}, "endpoints": ["https://a.test"], "mode": "merge"}"#,
        );

        let request = load_manifest(&path, LoadMode::Replace).unwrap();
        assert_eq!(request.resources(), &json!({"/": "root"}));
        assert_eq!(request.endpoints().map(<[String]>::len), Some(1));
        assert_eq!(request.mode(), LoadMode::Merge);
    }

    #[test]
    fn test_configured_mode_is_default() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, r#"{"/a": "1"}"#);
        let request = load_manifest(&path, LoadMode::Merge).unwrap();
        assert_eq!(request.mode(), LoadMode::Merge);
    }

    #[test]
    fn test_syntax_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "{not json");
        assert!(matches!(
            load_manifest(&path, LoadMode::Replace),
            Err(ConfigFileError::ManifestSyntax { .. })
        ));
    }

    #[test]
    fn test_bad_combined_endpoints() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, r#"{"resources": {}, "endpoints": 3}"#);
        match load_manifest(&path, LoadMode::Replace) {
            Err(ConfigFileError::ManifestContent { source, .. }) => {
                assert_eq!(source, ConfigError::EndpointsNotList { found: "number" });
            }
            other => panic!("Expected ManifestContent, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_manifest(&dir.path().join("nope.json"), LoadMode::Replace);
        assert!(matches!(result, Err(ConfigFileError::Io { .. })));
    }
}
