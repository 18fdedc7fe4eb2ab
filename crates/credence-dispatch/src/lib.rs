//! Credence Dispatch Layer
//!
//! Fans a claim out to responders and normalizes whatever comes back.
//!
//! # Architecture
//!
//! A [`MinerQueryDispatcher`] owns one [`DispatchStrategy`], chosen once at
//! construction from [`DispatchConfig::mode`]:
//!
//! - [`LiveDispatch`]: submit-and-poll against the responder network over HTTP
//! - [`SimulatedDispatch`]: deterministic local synthesis seeded by the claim
//!
//! Strategies return raw JSON payloads; every payload goes through the
//! [`ResponseValidator`] so malformed elements are contained per response.
//!
//! # Examples
//!
//! ```
//! use credence_dispatch::{DispatchConfig, MinerQueryDispatcher};
//! use credence_domain::{ClaimKind, ClaimQuery};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let dispatcher = MinerQueryDispatcher::new(DispatchConfig::simulated()).unwrap();
//! let query = ClaimQuery::new("Water boils at 100C at sea level", ClaimKind::Text, 4, 30_000).unwrap();
//!
//! let responses = dispatcher.dispatch(&query).await.unwrap();
//! assert_eq!(responses.len(), 4);
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod dispatcher;
mod error;
mod live;
mod metrics;
mod simulated;
mod validator;

use async_trait::async_trait;
use credence_domain::ClaimQuery;
use serde_json::Value;

pub use config::{DispatchConfig, DispatchMode, DEFAULT_ENDPOINT};
pub use dispatcher::{DispatchOutcome, MinerQueryDispatcher};
pub use error::DispatchError;
pub use live::LiveDispatch;
pub use metrics::{DispatchMetrics, HealthStatus};
pub use simulated::SimulatedDispatch;
pub use validator::{ResponseValidator, ValidatedResponse, NO_REASONING, RECOVERED_CONFIDENCE};

/// A source of raw responder payloads
///
/// Implementations perform the I/O (or synthesis) and return payloads as
/// received; validation happens in the dispatcher.
#[async_trait]
pub trait DispatchStrategy: Send + Sync {
    /// Collect raw payloads for `query`
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Timeout`] when `query.timeout()` elapses
    /// before the responders finish; other variants per implementation.
    async fn fetch(&self, query: &ClaimQuery) -> Result<Vec<Value>, DispatchError>;

    /// Number of reachable responders, if the strategy can tell
    async fn probe(&self) -> Result<Option<u64>, DispatchError> {
        Ok(None)
    }

    /// Mode this strategy implements
    fn mode(&self) -> DispatchMode;
}
