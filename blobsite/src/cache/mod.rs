//! Optional response caching.
//!
//! # Architecture
//!
//! ```text
//! SiteGateway ──► CacheGateway ──► Arc<dyn ResponseCache> ◄── ResponseStore::open(name)
//!                 (no-op when         (host capability,
//!                  disabled)           e.g. MemoryResponseStore)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use blobsite::cache::{CacheGateway, MemoryResponseStore};
//!
//! let store = MemoryResponseStore::new(64 * 1024 * 1024);
//! let cache = CacheGateway::open(&store, "site-v1").await?;
//! ```

mod gateway;
mod memory;
mod traits;

pub use gateway::CacheGateway;
pub use memory::{MemoryResponseCache, MemoryResponseStore, DEFAULT_MEMORY_CACHE_SIZE};
pub use traits::{BoxFuture, CacheError, ResponseCache, ResponseStore};
