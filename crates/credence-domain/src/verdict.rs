//! Verdict module - the reduced credibility judgment and its evidence

use serde::{Deserialize, Serialize};

/// A deduplicated citation merged across responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportingSource {
    /// Source URL (merge key)
    pub url: String,

    /// Human-readable title
    pub title: String,

    /// Merged credibility of the responses that cited this URL
    pub credibility: f64,

    /// First substantive sentence of the citing response's reasoning
    pub excerpt: String,

    /// Host of the URL without a leading `www.`
    pub domain: String,
}

/// The single credibility judgment reduced from a set of responses
///
/// Every field except `processing_time_ms` is a deterministic function of the
/// input responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedResult {
    /// Blended credibility score in `[0, 1]`
    pub credibility_score: f64,

    /// Confidence in the score, in `[0, 1]`
    pub confidence: f64,

    /// Whether the score reaches the credibility threshold
    pub is_credible: bool,

    /// Human-readable rationale
    pub consensus: String,

    /// Ranked citations (at most the configured cap, descending credibility)
    pub supporting_sources: Vec<SupportingSource>,

    /// Wall-clock time spent aggregating
    pub processing_time_ms: u64,
}
