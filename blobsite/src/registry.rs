//! Mapping from canonical site path to content identifier.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{json_kind, ConfigError};
use crate::path::normalize;

/// How a `load` combines new entries with the existing registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// Discard every previous entry, keep only the newly loaded ones.
    #[default]
    Replace,
    /// Keep previous entries; new entries win on key collisions.
    Merge,
}

impl LoadMode {
    /// Config-file spelling of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadMode::Replace => "replace",
            LoadMode::Merge => "merge",
        }
    }
}

impl fmt::Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoadMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "replace" => Ok(LoadMode::Replace),
            "merge" => Ok(LoadMode::Merge),
            other => Err(format!("unknown load mode '{}' (expected replace or merge)", other)),
        }
    }
}

/// Path to content-id registry.
///
/// Keys are always stored in canonical form (see [`crate::path`]); lookups
/// expect an already-normalized path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceRegistry {
    entries: HashMap<String, String>,
}

impl ResourceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an untyped mapping into the registry.
    ///
    /// The mapping must be an object whose values are non-empty strings.
    /// Validation happens before anything is touched, so a rejected mapping
    /// leaves the registry as it was.
    ///
    /// Returns the number of entries in the mapping.
    pub fn load(&mut self, mapping: &Value, mode: LoadMode) -> Result<usize, ConfigError> {
        let parsed = parse_mapping(mapping)?;
        let count = parsed.len();
        self.apply(parsed, mode);
        Ok(count)
    }

    /// Loads already-typed entries, normalizing every key.
    pub fn load_entries<I, K, V>(&mut self, entries: I, mode: LoadMode) -> Result<usize, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut parsed = HashMap::new();
        for (path, id) in entries {
            let key = normalize(path.as_ref());
            let id = id.into();
            if id.is_empty() {
                return Err(ConfigError::EmptyContentId { path: key });
            }
            parsed.insert(key, id);
        }
        let count = parsed.len();
        self.apply(parsed, mode);
        Ok(count)
    }

    fn apply(&mut self, parsed: HashMap<String, String>, mode: LoadMode) {
        match mode {
            LoadMode::Replace => self.entries = parsed,
            LoadMode::Merge => self.entries.extend(parsed),
        }
    }

    /// Content id for a normalized path.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    /// Whether a normalized path is registered.
    pub fn has(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(path, content_id)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn parse_mapping(mapping: &Value) -> Result<HashMap<String, String>, ConfigError> {
    let Value::Object(object) = mapping else {
        return Err(ConfigError::MappingNotObject {
            found: json_kind(mapping),
        });
    };

    let mut parsed = HashMap::with_capacity(object.len());
    for (raw_path, value) in object {
        let key = normalize(raw_path);
        let id = match value {
            Value::String(id) if id.is_empty() => {
                return Err(ConfigError::EmptyContentId { path: key });
            }
            Value::String(id) => id.clone(),
            other => {
                return Err(ConfigError::ContentIdNotString {
                    path: key,
                    found: json_kind(other),
                });
            }
        };
        parsed.insert(key, id);
    }
    Ok(parsed)
}
