//! Aggregator error types

use thiserror::Error;

/// Errors that can occur during aggregation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregationError {
    /// Aggregation over zero responses is undefined
    #[error("Cannot aggregate an empty response set")]
    EmptyInput,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
