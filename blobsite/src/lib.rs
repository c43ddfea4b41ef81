//! Blobsite - serve a static site straight out of blob storage
//!
//! A site is a mapping from request paths to content identifiers. Requests
//! for registered paths are resolved by fetching the content from a
//! prioritized list of retrieval endpoints, with per-attempt timeouts and
//! failover, tagged with a content type, optionally cached, and reported to
//! observers as lifecycle events.
//!
//! The entry point is [`gateway::SiteGateway`].

pub mod cache;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod fetch;
pub mod gateway;
pub mod logging;
pub mod mime;
pub mod notify;
pub mod path;
pub mod registry;
pub mod transport;

pub use error::ConfigError;
pub use gateway::{GatewayError, SiteGateway};

/// Crate version, as reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
