//! Miner response module - one responder's normalized opinion

use crate::confidence::clamp_unit;
use serde::{Deserialize, Serialize};

/// Neutral score used when a responder gave no usable score
pub const NEUTRAL_SCORE: f64 = 0.5;

/// One responder's opinion about a claim
///
/// Constructed through [`MinerResponse::new`], which clamps `score` and
/// `confidence` into `[0, 1]` (NaN becomes the neutral 0.5). Fields are
/// read-only afterwards. Deserialization goes through the same constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawMinerResponse")]
pub struct MinerResponse {
    responder_id: String,
    score: f64,
    reasoning: String,
    sources: Vec<String>,
    confidence: f64,
    processing_time_ms: u64,
}

/// Wire shape of a response before normalization
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMinerResponse {
    responder_id: String,
    score: f64,
    reasoning: String,
    #[serde(default)]
    sources: Vec<String>,
    confidence: f64,
    #[serde(default)]
    processing_time_ms: u64,
}

impl From<RawMinerResponse> for MinerResponse {
    fn from(raw: RawMinerResponse) -> Self {
        Self::new(
            raw.responder_id,
            raw.score,
            raw.reasoning,
            raw.sources,
            raw.confidence,
            raw.processing_time_ms,
        )
    }
}

impl MinerResponse {
    /// Create a normalized response
    ///
    /// # Examples
    ///
    /// ```
    /// use credence_domain::MinerResponse;
    ///
    /// let response = MinerResponse::new("miner-7", 1.4, "Looks right", vec![], f64::NAN, 120);
    /// assert_eq!(response.score(), 1.0);
    /// assert_eq!(response.confidence(), 0.5);
    /// ```
    pub fn new(
        responder_id: impl Into<String>,
        score: f64,
        reasoning: impl Into<String>,
        sources: Vec<String>,
        confidence: f64,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            responder_id: responder_id.into(),
            score: clamp_unit(score, NEUTRAL_SCORE),
            reasoning: reasoning.into(),
            sources,
            confidence: clamp_unit(confidence, NEUTRAL_SCORE),
            processing_time_ms,
        }
    }

    /// Identifier of the responder that produced this opinion
    pub fn responder_id(&self) -> &str {
        &self.responder_id
    }

    /// Credibility score in `[0, 1]`
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Free-text rationale
    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    /// Cited source URLs
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Responder's self-reported confidence in `[0, 1]`
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Time the responder spent producing the opinion
    pub fn processing_time_ms(&self) -> u64 {
        self.processing_time_ms
    }
}
