//! Error types for the Analyzer

use credence_aggregator::AggregationError;
use credence_dispatch::DispatchError;
use thiserror::Error;

/// Errors that can occur during analysis
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyzerError {
    /// The request violates a boundary constraint
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Collecting responder opinions failed
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Reducing the opinions failed
    #[error("Aggregation error: {0}")]
    Aggregation(#[from] AggregationError),
}
