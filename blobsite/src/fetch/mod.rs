//! Multi-endpoint failover retrieval.
//!
//! A content id is fetched from each endpoint in priority order until one
//! succeeds. Each attempt is bounded by its own cancellation deadline, so the
//! worst case is `attempt_timeout × endpoint_count`.
//!
//! ```text
//! endpoint[0] ──fail/timeout──► endpoint[1] ──fail/timeout──► … ──► Exhausted(last error)
//!      │                             │
//!    success                       success
//!      ▼                             ▼
//!    bytes                         bytes
//! ```

mod error;
mod failover;

pub use error::{AttemptError, RetrievalError};
pub use failover::{FailoverFetcher, DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_BLOB_PATH};
