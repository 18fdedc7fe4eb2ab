//! Credence Aggregator
//!
//! Reduces many untrusted responder opinions into one bounded, explainable
//! credibility verdict.
//!
//! The aggregator provides:
//! - Outlier-resistant score blending (median-dominated)
//! - A three-signal confidence estimate (agreement, responder confidence, sample size)
//! - A templated consensus narrative with recurring reasoning themes
//! - Deduplicated, ranked supporting sources
//!
//! Everything in this crate is a pure function of its input; nothing here
//! performs I/O or keeps state between calls.
//!
//! # Examples
//!
//! ```
//! use credence_aggregator::RobustAggregator;
//! use credence_domain::MinerResponse;
//!
//! let aggregator = RobustAggregator::default_config();
//! let responses = vec![
//!     MinerResponse::new("a", 0.9, "Backed by reliable sources.", vec![], 0.8, 100),
//!     MinerResponse::new("b", 0.85, "Matches official data.", vec![], 0.7, 120),
//!     MinerResponse::new("c", 0.1, "Looks fabricated.", vec![], 0.9, 90),
//! ];
//!
//! let result = aggregator.aggregate(&responses).unwrap();
//! assert!(result.is_credible);
//! ```

#![warn(missing_docs)]

mod aggregator;
mod config;
mod error;
mod narrator;
mod ranker;

pub use aggregator::{Assessment, RobustAggregator};
pub use config::{AggregationConfig, CredibilityBands};
pub use error::AggregationError;
pub use narrator::{ConsensusNarrator, THEME_VOCABULARY};
pub use ranker::{domain_of, SourceRanker};
