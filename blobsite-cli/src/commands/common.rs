//! Setup shared by the commands that run a gateway.

use std::path::Path;
use std::sync::Arc;

use blobsite::cache::MemoryResponseStore;
use blobsite::config::{load_manifest, CacheSettings, ConfigFile, ConfigFileError};
use blobsite::gateway::{LoadSummary, SiteGateway};
use blobsite::logging::{init_logging, WorkerGuard};
use blobsite::notify::ObserverHub;
use blobsite::transport::AsyncReqwestClient;
use tracing::info;

use crate::error::CliError;

/// Gateway over real HTTP, plus the hub its events go to.
pub struct Runtime {
    pub gateway: SiteGateway<AsyncReqwestClient>,
    pub hub: Arc<ObserverHub>,
}

/// Read `--config PATH`, or the default config file.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    Ok(config)
}

/// Install logging as configured. Keep the guard alive until exit.
pub fn start_logging(config: &ConfigFile, verbose: bool) -> Result<Option<WorkerGuard>, CliError> {
    Ok(init_logging(config.logging.directory.as_deref(), verbose)?)
}

/// Build a gateway from settings. The cache is only opened when
/// `use_cache` is set and a cache name is configured.
pub async fn build_runtime(config: &ConfigFile, use_cache: bool) -> Result<Runtime, CliError> {
    let hub = Arc::new(ObserverHub::new());
    let mut gateway_config = config.gateway_config();
    if !use_cache {
        gateway_config.cache_name = None;
    }

    let mut builder = SiteGateway::builder(AsyncReqwestClient::new()?)
        .config(gateway_config.clone())
        .observers(hub.clone());
    if !config.gateway.endpoints.is_empty() {
        builder = builder.endpoints(config.gateway.endpoints.iter().cloned());
    }
    if gateway_config.cache_name.is_some() {
        builder = builder.response_store(Arc::new(response_store(&config.cache)));
    }

    let gateway = builder.build().await?;
    Ok(Runtime { gateway, hub })
}

/// In-memory store sized and aged per `[cache]`.
fn response_store(settings: &CacheSettings) -> MemoryResponseStore {
    let store = MemoryResponseStore::new(settings.memory_size);
    match settings.ttl() {
        Some(ttl) => store.with_ttl(ttl),
        None => store,
    }
}

/// Load the configured manifest into the gateway.
pub fn load_site(
    gateway: &SiteGateway<AsyncReqwestClient>,
    config: &ConfigFile,
) -> Result<LoadSummary, CliError> {
    let manifest = config
        .site
        .manifest
        .as_deref()
        .ok_or(ConfigFileError::ManifestMissing)?;
    let request = load_manifest(manifest, config.site.load_mode)?;
    let summary = gateway.load(request)?;

    info!(
        manifest = %manifest.display(),
        resources = summary.registered,
        endpoints = summary.endpoints,
        "Site manifest loaded"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_site(dir: &TempDir, ini: &str, manifest: &str) -> std::path::PathBuf {
        fs::write(dir.path().join("site.json"), manifest).unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, ini).unwrap();
        path
    }

    #[tokio::test]
    async fn test_config_endpoints_with_bare_manifest() {
        let dir = TempDir::new().unwrap();
        let path = write_site(
            &dir,
            "[gateway]\nendpoints = https://a.test\n[site]\nmanifest = site.json\n",
            r#"{"/index.html": "id1", "/app.js": "id2"}"#,
        );

        let config = load_config(Some(&path)).unwrap();
        let runtime = build_runtime(&config, true).await.unwrap();
        let summary = load_site(&runtime.gateway, &config).unwrap();

        assert_eq!(summary.registered, 2);
        assert_eq!(summary.endpoints, 1);
        assert!(!runtime.gateway.cache_enabled());
    }

    #[tokio::test]
    async fn test_manifest_supplies_endpoints() {
        let dir = TempDir::new().unwrap();
        let path = write_site(
            &dir,
            "[site]\nmanifest = site.json\n[cache]\nname = v1\n",
            r#"{"resources": {"/": "root"}, "endpoints": ["https://a.test", "https://b.test"]}"#,
        );

        let config = load_config(Some(&path)).unwrap();
        let runtime = build_runtime(&config, true).await.unwrap();
        let summary = load_site(&runtime.gateway, &config).unwrap();

        assert_eq!(summary.endpoints, 2);
        assert!(runtime.gateway.cache_enabled());
    }

    #[tokio::test]
    async fn test_cache_ttl_expires_stored_responses() {
        use blobsite::cache::{ResponseCache, ResponseStore};
        use blobsite::gateway::SiteResponse;
        use std::time::Duration;

        let settings = CacheSettings {
            name: Some("v1".to_string()),
            ttl_secs: Some(1),
            ..CacheSettings::default()
        };
        let store = response_store(&settings);
        let cache = store.open("v1").await.unwrap();
        let response = SiteResponse::ok("text/plain", "hi".into());

        cache.put("GET /a", response.clone()).await.unwrap();
        assert_eq!(cache.lookup("GET /a").await.unwrap(), Some(response));

        tokio::time::sleep(Duration::from_millis(1200)).await;
        store.cache("v1").sync().await;
        assert!(cache.lookup("GET /a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_no_cache_flag_wins() {
        let dir = TempDir::new().unwrap();
        let path = write_site(&dir, "[cache]\nname = v1\n", "{}");

        let config = load_config(Some(&path)).unwrap();
        let runtime = build_runtime(&config, false).await.unwrap();
        assert!(!runtime.gateway.cache_enabled());
    }

    #[tokio::test]
    async fn test_missing_manifest_setting() {
        let dir = TempDir::new().unwrap();
        let path = write_site(&dir, "[gateway]\nendpoints = https://a.test\n", "{}");

        let config = load_config(Some(&path)).unwrap();
        let runtime = build_runtime(&config, false).await.unwrap();
        let err = load_site(&runtime.gateway, &config).unwrap_err();
        assert!(matches!(
            err,
            CliError::ConfigFile(ConfigFileError::ManifestMissing)
        ));
    }
}
