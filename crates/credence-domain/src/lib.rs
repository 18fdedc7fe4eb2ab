//! Credence Domain Layer
//!
//! Core value types shared by every other Credence crate. This crate holds no
//! I/O and no algorithms beyond the invariants of its own types.
//!
//! ## Key Concepts
//!
//! - **Claim query**: a claim plus how many responders to ask and how long to wait
//! - **Miner response**: one untrusted responder's opinion, always normalized into `[0, 1]`
//! - **Aggregated result**: the single credibility verdict reduced from many responses
//! - **Supporting source**: a deduplicated citation with a merged credibility
//!
//! ## Architecture
//!
//! - Only `uuid` and `serde` as external dependencies
//! - Pure data and constructors enforcing invariants
//! - Algorithms live in `credence-aggregator`, I/O in `credence-dispatch`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod confidence;
pub mod response;
pub mod verdict;

// Re-exports for convenience
pub use claim::{AnalysisId, ClaimKind, ClaimQuery};
pub use confidence::{clamp_unit, is_unit};
pub use response::{MinerResponse, NEUTRAL_SCORE};
pub use verdict::{AggregatedResult, SupportingSource};
