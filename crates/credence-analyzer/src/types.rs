//! Request and report types for analysis

use chrono::{DateTime, Utc};
use credence_dispatch::{DispatchMode, ValidatedResponse};
use credence_domain::{AnalysisId, ClaimKind, SupportingSource};
use serde::{Deserialize, Serialize};

/// Request to analyze one claim
///
/// Deserializes from the caller-facing shape
/// `{"claim", "type": "text"|"url", "options": {"minResponders", "timeoutMs"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Claim text, or a URL for reference claims
    pub claim: String,

    /// Kind of claim
    #[serde(rename = "type", default)]
    pub kind: ClaimKind,

    /// Optional overrides of the configured defaults
    #[serde(default)]
    pub options: AnalyzeOptions,
}

/// Per-request overrides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOptions {
    /// Responders to request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_responders: Option<u32>,

    /// Dispatch deadline in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl AnalyzeRequest {
    /// Text claim with default options
    pub fn new(claim: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            kind: ClaimKind::Text,
            options: AnalyzeOptions::default(),
        }
    }

    /// Set the claim kind
    pub fn with_kind(mut self, kind: ClaimKind) -> Self {
        self.kind = kind;
        self
    }

    /// Override the responder count
    pub fn with_min_responders(mut self, min_responders: u32) -> Self {
        self.options.min_responders = Some(min_responders);
        self
    }

    /// Override the deadline
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.options.timeout_ms = Some(timeout_ms);
        self
    }
}

/// One responder's contribution, as reported back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponderBreakdown {
    /// Responder identifier
    pub responder_id: String,
    /// Normalized score
    pub score: f64,
    /// Normalized confidence
    pub confidence: f64,
    /// Rationale as given (or the fallback note)
    pub reasoning: String,
    /// Cited URLs
    pub sources: Vec<String>,
    /// Responder-reported processing time
    pub processing_time_ms: u64,
    /// Whether the payload was replaced by the neutral fallback
    pub recovered: bool,
}

impl From<&ValidatedResponse> for ResponderBreakdown {
    fn from(validated: &ValidatedResponse) -> Self {
        let response = validated.response();
        Self {
            responder_id: response.responder_id().to_string(),
            score: response.score(),
            confidence: response.confidence(),
            reasoning: response.reasoning().to_string(),
            sources: response.sources().to_vec(),
            processing_time_ms: response.processing_time_ms(),
            recovered: validated.is_recovered(),
        }
    }
}

/// Metadata about an analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    /// When the analysis finished
    pub processed_at: DateTime<Utc>,
    /// Responses aggregated
    pub responder_count: usize,
    /// Responses that were recovered fallbacks
    pub recovered_count: usize,
    /// Total wall clock of the analysis
    pub processing_time_ms: u64,
    /// Wall clock spent inside aggregation
    pub aggregation_time_ms: u64,
    /// Mode that produced the responses
    pub dispatch_mode: DispatchMode,
    /// Whether a live dispatch fell back to simulation
    pub fell_back: bool,
}

/// Result of analyzing one claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Identifier of this analysis
    pub id: AnalysisId,
    /// The claim as analyzed (trimmed)
    pub claim: String,
    /// Kind of claim
    pub kind: ClaimKind,
    /// Aggregate credibility in `[0, 1]`
    pub credibility_score: f64,
    /// Aggregate confidence in `[0, 1]`
    pub confidence: f64,
    /// Verdict
    pub is_credible: bool,
    /// Human-readable rationale
    pub consensus: String,
    /// Ranked supporting sources
    pub supporting_sources: Vec<SupportingSource>,
    /// Every response that went into the verdict
    pub per_responder_breakdown: Vec<ResponderBreakdown>,
    /// Timing and provenance
    pub metadata: AnalysisMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use credence_dispatch::ResponseValidator;
    use serde_json::json;

    #[test]
    fn test_request_from_json() {
        let request: AnalyzeRequest = serde_json::from_value(json!({
            "claim": "https://example.com/article",
            "type": "url",
            "options": {"minResponders": 5}
        }))
        .unwrap();

        assert_eq!(request.kind, ClaimKind::Reference);
        assert_eq!(request.options.min_responders, Some(5));
        assert_eq!(request.options.timeout_ms, None);
    }

    #[test]
    fn test_request_defaults() {
        let request: AnalyzeRequest = serde_json::from_value(json!({"claim": "x"})).unwrap();
        assert_eq!(request, AnalyzeRequest::new("x"));
    }

    #[test]
    fn test_request_builder() {
        let request = AnalyzeRequest::new("claim")
            .with_kind(ClaimKind::Reference)
            .with_min_responders(7)
            .with_timeout_ms(9_000);

        assert_eq!(request.kind, ClaimKind::Reference);
        assert_eq!(request.options.min_responders, Some(7));
        assert_eq!(request.options.timeout_ms, Some(9_000));
    }

    #[test]
    fn test_breakdown_from_validated() {
        let validator = ResponseValidator::new();

        let clean = ResponderBreakdown::from(&validator.validate(&json!({"uid": "m1", "score": 0.4}), 0));
        assert_eq!(clean.responder_id, "m1");
        assert!(!clean.recovered);

        let recovered = ResponderBreakdown::from(&validator.validate(&json!(null), 1));
        assert!(recovered.recovered);
        assert_eq!(recovered.confidence, 0.1);
    }
}
