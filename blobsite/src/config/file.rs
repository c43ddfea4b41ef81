//! The `config.ini` file.
//!
//! ```ini
//! [gateway]
//! endpoints = https://a.example, https://b.example
//! timeout_secs = 5
//! blob_path = /v1/blobs/
//!
//! [site]
//! manifest = site.json
//! load_mode = replace
//!
//! [cache]
//! name = site-v1
//! memory_size = 256MB
//! ttl_secs = 3600
//!
//! [server]
//! bind = 127.0.0.1:8787
//!
//! [logging]
//! directory = /var/log/blobsite
//! ```
//!
//! A missing file yields the defaults. Unknown sections and keys are ignored.
//!
//! Cached responses are keyed by request only. Reloading the manifest does
//! not invalidate them, so give each deployment its own `[cache] name` (or
//! set `ttl_secs`) for new content to be served.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::{Ini, Properties};

use super::error::ConfigFileError;
use super::size::parse_size;
use crate::cache::DEFAULT_MEMORY_CACHE_SIZE;
use crate::fetch::{DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_BLOB_PATH};
use crate::gateway::GatewayConfig;
use crate::registry::LoadMode;

/// Default server bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8787";

const CONFIG_FILE_NAME: &str = "config.ini";

/// Directory holding `config.ini`: `<platform config dir>/blobsite`.
pub fn config_directory() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("blobsite")
}

/// Default location of `config.ini`.
pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

/// `[gateway]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    /// Retrieval endpoints in priority order. May be empty when the
    /// manifest supplies them.
    pub endpoints: Vec<String>,
    pub timeout_secs: u64,
    pub blob_path: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            endpoints: Vec::new(),
            timeout_secs: DEFAULT_ATTEMPT_TIMEOUT.as_secs(),
            blob_path: DEFAULT_BLOB_PATH.to_string(),
        }
    }
}

/// `[site]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteSettings {
    /// Manifest path. Relative paths are resolved against the directory
    /// of the config file they were read from.
    pub manifest: Option<PathBuf>,
    pub load_mode: LoadMode,
}

/// `[cache]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Cache name; `None` disables response caching.
    pub name: Option<String>,
    pub memory_size: u64,
    /// Entry lifetime; `None` keeps entries until evicted.
    pub ttl_secs: Option<u64>,
}

impl CacheSettings {
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            name: None,
            memory_size: DEFAULT_MEMORY_CACHE_SIZE,
            ttl_secs: None,
        }
    }
}

/// `[server]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Also write logs to daily files here.
    pub directory: Option<PathBuf>,
}

/// Parsed `config.ini`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub gateway: GatewaySettings,
    pub site: SiteSettings,
    pub cache: CacheSettings,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigFileError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let ini = Ini::load_from_str(&text).map_err(|e| ConfigFileError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut config = Self::from_ini(&ini)?;
        if let (Some(manifest), Some(base)) = (&config.site.manifest, path.parent()) {
            if manifest.is_relative() {
                config.site.manifest = Some(base.join(manifest));
            }
        }
        Ok(config)
    }

    /// Build from already-parsed INI data. Relative paths are kept as-is.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigFileError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("gateway")) {
            if let Some(value) = non_empty(section, "endpoints") {
                config.gateway.endpoints = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            if let Some(value) = non_empty(section, "timeout_secs") {
                config.gateway.timeout_secs = match value.parse::<u64>() {
                    Ok(secs) if secs > 0 => secs,
                    _ => {
                        return Err(ConfigFileError::invalid(
                            "gateway.timeout_secs",
                            value,
                            "expected a positive whole number of seconds",
                        ))
                    }
                };
            }
            if let Some(value) = non_empty(section, "blob_path") {
                config.gateway.blob_path = value.to_string();
            }
        }

        if let Some(section) = ini.section(Some("site")) {
            config.site.manifest = non_empty(section, "manifest").map(PathBuf::from);
            if let Some(value) = non_empty(section, "load_mode") {
                config.site.load_mode = value.parse().map_err(|_| {
                    ConfigFileError::invalid("site.load_mode", value, "expected replace or merge")
                })?;
            }
        }

        if let Some(section) = ini.section(Some("cache")) {
            config.cache.name = non_empty(section, "name").map(str::to_string);
            if let Some(value) = non_empty(section, "memory_size") {
                config.cache.memory_size = parse_size(value).ok_or_else(|| {
                    ConfigFileError::invalid(
                        "cache.memory_size",
                        value,
                        "expected a size such as 268435456 or 256MB",
                    )
                })?;
            }
            if let Some(value) = non_empty(section, "ttl_secs") {
                config.cache.ttl_secs = match value.parse::<u64>() {
                    Ok(secs) if secs > 0 => Some(secs),
                    _ => {
                        return Err(ConfigFileError::invalid(
                            "cache.ttl_secs",
                            value,
                            "expected a positive whole number of seconds",
                        ))
                    }
                };
            }
        }

        if let Some(section) = ini.section(Some("server")) {
            if let Some(value) = non_empty(section, "bind") {
                config.server.bind = value.to_string();
            }
        }

        if let Some(section) = ini.section(Some("logging")) {
            config.logging.directory = non_empty(section, "directory").map(PathBuf::from);
        }

        Ok(config)
    }

    /// Gateway runtime settings derived from this file.
    pub fn gateway_config(&self) -> GatewayConfig {
        let config = GatewayConfig::new()
            .with_attempt_timeout(Duration::from_secs(self.gateway.timeout_secs))
            .with_blob_path(&self.gateway.blob_path);
        match &self.cache.name {
            Some(name) => config.with_cache_name(name),
            None => config,
        }
    }
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}
