//! Addressable `section.key` settings, for `config list` style tooling.

use std::fmt;
use std::str::FromStr;

use super::file::ConfigFile;
use super::size::format_size;

/// One recognised setting in `config.ini`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    GatewayEndpoints,
    GatewayTimeoutSecs,
    GatewayBlobPath,
    SiteManifest,
    SiteLoadMode,
    CacheName,
    CacheMemorySize,
    CacheTtlSecs,
    ServerBind,
    LoggingDirectory,
}

impl ConfigKey {
    /// Every key, in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::GatewayEndpoints,
            ConfigKey::GatewayTimeoutSecs,
            ConfigKey::GatewayBlobPath,
            ConfigKey::SiteManifest,
            ConfigKey::SiteLoadMode,
            ConfigKey::CacheName,
            ConfigKey::CacheMemorySize,
            ConfigKey::CacheTtlSecs,
            ConfigKey::ServerBind,
            ConfigKey::LoggingDirectory,
        ]
    }

    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::GatewayEndpoints
            | ConfigKey::GatewayTimeoutSecs
            | ConfigKey::GatewayBlobPath => "gateway",
            ConfigKey::SiteManifest | ConfigKey::SiteLoadMode => "site",
            ConfigKey::CacheName | ConfigKey::CacheMemorySize | ConfigKey::CacheTtlSecs => {
                "cache"
            }
            ConfigKey::ServerBind => "server",
            ConfigKey::LoggingDirectory => "logging",
        }
    }

    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::GatewayEndpoints => "endpoints",
            ConfigKey::GatewayTimeoutSecs => "timeout_secs",
            ConfigKey::GatewayBlobPath => "blob_path",
            ConfigKey::SiteManifest => "manifest",
            ConfigKey::SiteLoadMode => "load_mode",
            ConfigKey::CacheName => "name",
            ConfigKey::CacheMemorySize => "memory_size",
            ConfigKey::CacheTtlSecs => "ttl_secs",
            ConfigKey::ServerBind => "bind",
            ConfigKey::LoggingDirectory => "directory",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Display value; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::GatewayEndpoints => config.gateway.endpoints.join(", "),
            ConfigKey::GatewayTimeoutSecs => config.gateway.timeout_secs.to_string(),
            ConfigKey::GatewayBlobPath => config.gateway.blob_path.clone(),
            ConfigKey::SiteManifest => config
                .site
                .manifest
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            ConfigKey::SiteLoadMode => config.site.load_mode.to_string(),
            ConfigKey::CacheName => config.cache.name.clone().unwrap_or_default(),
            ConfigKey::CacheMemorySize => format_size(config.cache.memory_size),
            ConfigKey::CacheTtlSecs => config
                .cache
                .ttl_secs
                .map(|secs| secs.to_string())
                .unwrap_or_default(),
            ConfigKey::ServerBind => config.server.bind.clone(),
            ConfigKey::LoggingDirectory => config
                .logging
                .directory
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

/// Not a recognised `section.key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownConfigKey(pub String);

impl fmt::Display for UnknownConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown configuration key '{}'", self.0)
    }
}

impl std::error::Error for UnknownConfigKey {}

impl FromStr for ConfigKey {
    type Err = UnknownConfigKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| UnknownConfigKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_names() {
        for key in ConfigKey::all() {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
        }
        assert_eq!(
            "Cache.Name".parse::<ConfigKey>().unwrap(),
            ConfigKey::CacheName
        );
    }

    #[test]
    fn test_unknown_key() {
        let err = "cache.colour".parse::<ConfigKey>().unwrap_err();
        assert_eq!(err, UnknownConfigKey("cache.colour".to_string()));
    }

    #[test]
    fn test_get_values() {
        let mut config = ConfigFile::default();
        config.gateway.endpoints = vec!["https://a.test".into(), "https://b.test".into()];

        assert_eq!(
            ConfigKey::GatewayEndpoints.get(&config),
            "https://a.test, https://b.test"
        );
        assert_eq!(ConfigKey::GatewayTimeoutSecs.get(&config), "5");
        assert_eq!(ConfigKey::SiteLoadMode.get(&config), "replace");
        assert_eq!(ConfigKey::CacheName.get(&config), "");
        assert_eq!(ConfigKey::CacheMemorySize.get(&config), "256.0 MB");
        assert_eq!(ConfigKey::CacheTtlSecs.get(&config), "");

        config.cache.ttl_secs = Some(3600);
        assert_eq!(ConfigKey::CacheTtlSecs.get(&config), "3600");
    }
}
