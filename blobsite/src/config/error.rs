//! Errors raised while reading the configuration file and site manifest.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::error::ConfigError;

/// Failure loading `config.ini` or a manifest document.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The INI text could not be parsed.
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// A recognised key held a value of the wrong shape.
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// The manifest is not valid JSON.
    #[error("manifest {} is not valid JSON: {message}", path.display())]
    ManifestSyntax { path: PathBuf, message: String },

    /// The manifest is JSON but not a usable load document.
    #[error("manifest {} is invalid: {source}", path.display())]
    ManifestContent {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    /// No manifest path was given on the command line or in `[site]`.
    #[error("no site manifest configured; set site.manifest in config.ini")]
    ManifestMissing,
}

impl ConfigFileError {
    pub(crate) fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_names_the_key() {
        let err = ConfigFileError::invalid("gateway.timeout_secs", "soon", "expected a whole number");
        let msg = err.to_string();
        assert!(msg.contains("gateway.timeout_secs"));
        assert!(msg.contains("soon"));
    }

    #[test]
    fn test_manifest_content_keeps_source() {
        use std::error::Error as _;

        let err = ConfigFileError::ManifestContent {
            path: PathBuf::from("site.json"),
            source: ConfigError::NoEndpoints,
        };
        assert!(err.to_string().contains("site.json"));
        assert!(err.source().is_some());
    }
}
