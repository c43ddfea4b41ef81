//! Configuration file and site manifest loading.
//!
//! `config.ini` lives at `<platform config dir>/blobsite/config.ini` and
//! holds the gateway, cache, server and logging settings. The site itself
//! (path → content id mapping, optionally endpoints) comes from a JSON
//! manifest named in `[site] manifest`.

mod error;
mod file;
mod keys;
mod manifest;
mod size;

pub use error::ConfigFileError;
pub use file::{
    config_directory, config_file_path, CacheSettings, ConfigFile, GatewaySettings,
    LoggingSettings, ServerSettings, SiteSettings, DEFAULT_BIND,
};
pub use keys::{ConfigKey, UnknownConfigKey};
pub use manifest::load_manifest;
pub use size::{format_size, parse_size};
