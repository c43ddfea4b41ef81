//! The site gateway: registry lookup, failover retrieval, caching and
//! lifecycle notifications behind one request-handling facade.
//!
//! # Architecture
//!
//! ```text
//! host ──SiteRequest──► SiteGateway::handle
//!                           │
//!                           ├─► path::normalize ─► ResourceRegistry (snapshot)
//!                           ├─► CacheGateway::lookup
//!                           ├─► FailoverFetcher::fetch ─► AsyncHttpClient
//!                           ├─► mime::resolve
//!                           ├─► CacheGateway::persist (background)
//!                           └─► NotificationBus (LOADING / SUCCESS / ERROR)
//! ```

mod config;
mod error;
mod load;
mod orchestrator;
mod request;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use load::LoadRequest;
pub use orchestrator::{GatewayStatus, LoadSummary, SiteGateway, SiteGatewayBuilder};
pub use request::{Interception, SiteRequest, SiteResponse, STATUS_BAD_GATEWAY, STATUS_OK};
