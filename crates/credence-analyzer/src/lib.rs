//! Credence Analyzer
//!
//! The caller-facing analyze operation: validates a request, fans the claim
//! out through the dispatcher, and reduces the responses into a report.
//!
//! # Architecture
//!
//! ```text
//! AnalyzeRequest → resolve → MinerQueryDispatcher → ResponseValidator (×N)
//!                → RobustAggregator → ConsensusNarrator + SourceRanker → AnalysisReport
//! ```
//!
//! # Example Usage
//!
//! ```
//! use credence_analyzer::{Analyzer, AnalyzerConfig, AnalyzeRequest};
//! use credence_aggregator::AggregationConfig;
//! use credence_dispatch::DispatchConfig;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let analyzer = Analyzer::new(
//!     AnalyzerConfig::default(),
//!     DispatchConfig::simulated(),
//!     AggregationConfig::default(),
//! )?;
//!
//! let report = analyzer
//!     .analyze(AnalyzeRequest::new("The Pacific is the largest ocean").with_min_responders(5))
//!     .await?;
//!
//! assert_eq!(report.per_responder_breakdown.len(), 5);
//! assert!(report.supporting_sources.len() <= 10);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod analyzer;
mod config;
mod error;
mod types;

#[cfg(test)]
mod tests;

pub use analyzer::Analyzer;
pub use config::AnalyzerConfig;
pub use error::AnalyzerError;
pub use types::{
    AnalysisMetadata, AnalysisReport, AnalyzeOptions, AnalyzeRequest, ResponderBreakdown,
};
