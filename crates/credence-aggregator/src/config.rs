//! Aggregator configuration
//!
//! The blend weights and thresholds have no derivation beyond calibration, so
//! they are exposed here instead of being baked into the algorithm.

use serde::{Deserialize, Serialize};

/// Tolerance when checking that a weight group sums to 1
const WEIGHT_EPSILON: f64 = 1e-9;

/// Lower bounds of the narrative credibility bands
///
/// A score at or above `strong` is the strongest band; anything below `low`
/// falls into the "very low" band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CredibilityBands {
    /// Strong consensus band
    pub strong: f64,
    /// Generally credible band
    pub credible: f64,
    /// Mixed views band
    pub mixed: f64,
    /// Low credibility band
    pub low: f64,
}

impl Default for CredibilityBands {
    fn default() -> Self {
        Self {
            strong: 0.8,
            credible: 0.6,
            mixed: 0.4,
            low: 0.2,
        }
    }
}

/// Configuration for the aggregation pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Weight of the score median in the blend
    pub median_weight: f64,

    /// Weight of the confidence-weighted mean in the blend
    pub weighted_mean_weight: f64,

    /// Minimum blended score for a claim to be called credible
    pub credible_threshold: f64,

    /// Weight of score agreement in the aggregate confidence
    pub agreement_weight: f64,

    /// Weight of the mean responder confidence in the aggregate confidence
    pub responder_confidence_weight: f64,

    /// Weight of the sample size in the aggregate confidence
    pub sample_size_weight: f64,

    /// Multiplier on the score standard deviation when computing agreement
    pub agreement_spread_factor: f64,

    /// Response count at which sample-size confidence saturates
    pub sample_saturation: usize,

    /// Narrative bands
    pub bands: CredibilityBands,

    /// Scores at or above this count as "high" in the narrative
    pub high_score_threshold: f64,

    /// Scores at or below this count as "low" in the narrative
    pub low_score_threshold: f64,

    /// Maximum recurring themes mentioned in the narrative
    pub max_themes: usize,

    /// Maximum supporting sources returned
    pub max_sources: usize,

    /// A sentence must be longer than this many characters to become an excerpt
    pub min_excerpt_chars: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            median_weight: 0.7,
            weighted_mean_weight: 0.3,
            credible_threshold: 0.6,
            agreement_weight: 0.4,
            responder_confidence_weight: 0.4,
            sample_size_weight: 0.2,
            agreement_spread_factor: 2.0,
            sample_saturation: 10,
            bands: CredibilityBands::default(),
            high_score_threshold: 0.7,
            low_score_threshold: 0.3,
            max_themes: 3,
            max_sources: 10,
            min_excerpt_chars: 10,
        }
    }
}

impl AggregationConfig {
    /// Strict preset: the median dominates harder and the credibility bar is higher
    pub fn strict() -> Self {
        Self {
            median_weight: 0.8,
            weighted_mean_weight: 0.2,
            credible_threshold: 0.7,
            agreement_weight: 0.5,
            responder_confidence_weight: 0.3,
            sample_size_weight: 0.2,
            agreement_spread_factor: 2.5,
            sample_saturation: 15,
            ..Self::default()
        }
    }

    /// Lenient preset: the weighted mean counts more and fewer responders saturate confidence
    pub fn lenient() -> Self {
        Self {
            median_weight: 0.6,
            weighted_mean_weight: 0.4,
            credible_threshold: 0.55,
            agreement_spread_factor: 1.5,
            sample_saturation: 5,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let blend = self.median_weight + self.weighted_mean_weight;
        if (blend - 1.0).abs() > WEIGHT_EPSILON {
            return Err(format!(
                "median_weight + weighted_mean_weight must equal 1.0 (got {})",
                blend
            ));
        }

        let confidence =
            self.agreement_weight + self.responder_confidence_weight + self.sample_size_weight;
        if (confidence - 1.0).abs() > WEIGHT_EPSILON {
            return Err(format!(
                "confidence weights must sum to 1.0 (got {})",
                confidence
            ));
        }

        let weights = [
            ("median_weight", self.median_weight),
            ("weighted_mean_weight", self.weighted_mean_weight),
            ("agreement_weight", self.agreement_weight),
            ("responder_confidence_weight", self.responder_confidence_weight),
            ("sample_size_weight", self.sample_size_weight),
        ];
        for (name, value) in weights {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} {} out of range [0.0, 1.0]", name, value));
            }
        }

        let thresholds = [
            ("credible_threshold", self.credible_threshold),
            ("high_score_threshold", self.high_score_threshold),
            ("low_score_threshold", self.low_score_threshold),
            ("bands.strong", self.bands.strong),
            ("bands.credible", self.bands.credible),
            ("bands.mixed", self.bands.mixed),
            ("bands.low", self.bands.low),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} {} out of range [0.0, 1.0]", name, value));
            }
        }

        let bands = &self.bands;
        if !(bands.strong > bands.credible && bands.credible > bands.mixed && bands.mixed > bands.low) {
            return Err("bands must be strictly descending: strong > credible > mixed > low".to_string());
        }
        if self.low_score_threshold > self.high_score_threshold {
            return Err("low_score_threshold cannot exceed high_score_threshold".to_string());
        }
        if !self.agreement_spread_factor.is_finite() || self.agreement_spread_factor < 0.0 {
            return Err("agreement_spread_factor must be a non-negative number".to_string());
        }
        if self.sample_saturation == 0 {
            return Err("sample_saturation must be greater than 0".to_string());
        }
        if self.max_sources == 0 {
            return Err("max_sources must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
