//! Robust aggregation of responder scores
//!
//! Implements the outlier-resistant blend:
//! 1. Median of the scores
//! 2. Confidence-weighted mean of the scores
//! 3. Weighted blend of the two (median dominates)
//! 4. Threshold verdict
//! 5. Aggregate confidence from agreement, responder confidence and sample size

use crate::config::AggregationConfig;
use crate::error::AggregationError;
use crate::narrator::ConsensusNarrator;
use crate::ranker::SourceRanker;
use credence_domain::{clamp_unit, AggregatedResult, MinerResponse};
use std::time::Instant;
use tracing::debug;

/// Intermediate signals of one aggregation, kept for auditing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    /// Blended credibility score in `[0, 1]`
    pub credibility_score: f64,
    /// Aggregate confidence in `[0, 1]`
    pub confidence: f64,
    /// Whether the score reaches the credibility threshold
    pub is_credible: bool,
    /// Median of the scores
    pub median: f64,
    /// Confidence-weighted mean of the scores
    pub weighted_mean: f64,
    /// Population standard deviation of the scores
    pub std_dev: f64,
    /// Agreement signal in `[0, 1]`
    pub agreement: f64,
    /// Mean responder confidence
    pub average_confidence: f64,
    /// Sample-size signal in `[0, 1]`
    pub sample_size: f64,
    /// Number of responses aggregated
    pub response_count: usize,
}

/// Reduces validated responses into one credibility verdict
#[derive(Debug, Clone)]
pub struct RobustAggregator {
    config: AggregationConfig,
    narrator: ConsensusNarrator,
    ranker: SourceRanker,
}

impl RobustAggregator {
    /// Create an aggregator after validating the configuration
    pub fn new(config: AggregationConfig) -> Result<Self, AggregationError> {
        config.validate().map_err(AggregationError::Config)?;
        Ok(Self {
            narrator: ConsensusNarrator::new(&config),
            ranker: SourceRanker::new(&config),
            config,
        })
    }

    /// Create an aggregator with the default calibration
    pub fn default_config() -> Self {
        let config = AggregationConfig::default();
        Self {
            narrator: ConsensusNarrator::new(&config),
            ranker: SourceRanker::new(&config),
            config,
        }
    }

    /// The active configuration
    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Aggregate responses into a full result with narrative and sources
    ///
    /// # Errors
    ///
    /// Returns [`AggregationError::EmptyInput`] when `responses` is empty.
    pub fn aggregate(&self, responses: &[MinerResponse]) -> Result<AggregatedResult, AggregationError> {
        let started = Instant::now();

        let assessment = self.assess(responses)?;
        let consensus = self.narrator.narrate(responses, assessment.credibility_score);
        let supporting_sources = self.ranker.rank(responses);

        debug!(
            "Aggregated {} responses: score {:.3} (median {:.3}, weighted {:.3}), confidence {:.3}, {} sources",
            assessment.response_count,
            assessment.credibility_score,
            assessment.median,
            assessment.weighted_mean,
            assessment.confidence,
            supporting_sources.len()
        );

        Ok(AggregatedResult {
            credibility_score: assessment.credibility_score,
            confidence: assessment.confidence,
            is_credible: assessment.is_credible,
            consensus,
            supporting_sources,
            processing_time_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Compute the numeric verdict only
    ///
    /// # Errors
    ///
    /// Returns [`AggregationError::EmptyInput`] when `responses` is empty.
    pub fn assess(&self, responses: &[MinerResponse]) -> Result<Assessment, AggregationError> {
        if responses.is_empty() {
            return Err(AggregationError::EmptyInput);
        }

        let scores: Vec<f64> = responses.iter().map(MinerResponse::score).collect();

        // Steps 1-3: blend
        let median = median(&scores);
        let weighted_mean = weighted_mean(responses).unwrap_or(median);
        let credibility_score = if is_unanimous(&scores) {
            // Unanimous scores short-circuit so the blend returns the exact value.
            scores[0]
        } else {
            clamp_unit(
                self.config.median_weight * median + self.config.weighted_mean_weight * weighted_mean,
                median,
            )
        };

        // Step 4: verdict
        let is_credible = credibility_score >= self.config.credible_threshold;

        // Step 5: confidence
        let std_dev = population_std_dev(&scores);
        let agreement = (1.0 - self.config.agreement_spread_factor * std_dev).max(0.0);
        let confidences: Vec<f64> = responses.iter().map(MinerResponse::confidence).collect();
        let average_confidence = mean(&confidences);
        let sample_size = (responses.len() as f64 / self.config.sample_saturation as f64).min(1.0);

        let confidence = clamp_unit(
            self.config.agreement_weight * agreement
                + self.config.responder_confidence_weight * average_confidence
                + self.config.sample_size_weight * sample_size,
            0.0,
        );

        Ok(Assessment {
            credibility_score,
            confidence,
            is_credible,
            median,
            weighted_mean,
            std_dev,
            agreement,
            average_confidence,
            sample_size,
            response_count: responses.len(),
        })
    }
}

impl Default for RobustAggregator {
    fn default() -> Self {
        Self::default_config()
    }
}

/// Median of a non-empty slice (mean of the two middle values for even counts)
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Arithmetic mean of a non-empty slice
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation of a non-empty slice
fn population_std_dev(values: &[f64]) -> f64 {
    let mean = mean(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// `Σ(score·confidence) / Σ(confidence)`, or `None` when total confidence is zero
fn weighted_mean(responses: &[MinerResponse]) -> Option<f64> {
    let total_confidence: f64 = responses.iter().map(MinerResponse::confidence).sum();
    if total_confidence <= 0.0 {
        return None;
    }

    let weighted: f64 = responses.iter().map(|r| r.score() * r.confidence()).sum();
    Some(weighted / total_confidence)
}

fn is_unanimous(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[0] == pair[1])
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_responses() -> impl Strategy<Value = Vec<MinerResponse>> {
        prop::collection::vec((0.0f64..=1.0, 0.0f64..=1.0), 1..30).prop_map(|pairs| {
            pairs
                .into_iter()
                .enumerate()
                .map(|(i, (score, confidence))| {
                    MinerResponse::new(format!("m{}", i), score, "", vec![], confidence, 0)
                })
                .collect()
        })
    }

    proptest! {
        /// Property: score and confidence always stay in [0, 1]
        #[test]
        fn test_outputs_bounded(input in arb_responses()) {
            let aggregator = RobustAggregator::default_config();
            let result = aggregator.aggregate(&input).unwrap();

            prop_assert!((0.0..=1.0).contains(&result.credibility_score));
            prop_assert!((0.0..=1.0).contains(&result.confidence));
        }

        /// Property: the verdict is exactly the threshold comparison
        #[test]
        fn test_threshold_consistency(input in arb_responses()) {
            let aggregator = RobustAggregator::default_config();
            let result = aggregator.aggregate(&input).unwrap();

            prop_assert_eq!(result.is_credible, result.credibility_score >= 0.6);
        }

        /// Property: unanimous scores aggregate to that exact score
        #[test]
        fn test_identity(
            score in 0.0f64..=1.0,
            confidences in prop::collection::vec(0.0f64..=1.0, 1..20),
        ) {
            let input: Vec<_> = confidences
                .iter()
                .map(|&c| MinerResponse::new("m", score, "", vec![], c, 0))
                .collect();

            let aggregator = RobustAggregator::default_config();
            let result = aggregator.aggregate(&input).unwrap();

            prop_assert_eq!(result.credibility_score, score);
        }

        /// Property: the same input produces bit-identical numeric output
        #[test]
        fn test_determinism(input in arb_responses()) {
            let aggregator = RobustAggregator::default_config();
            let first = aggregator.assess(&input).unwrap();
            let second = aggregator.assess(&input.clone()).unwrap();

            prop_assert_eq!(first.credibility_score.to_bits(), second.credibility_score.to_bits());
            prop_assert_eq!(first.confidence.to_bits(), second.confidence.to_bits());
        }

        /// Property: a single outlier cannot drag a tight majority out of its band
        #[test]
        fn test_single_outlier_bounded(
            majority in 0.75f64..=0.95,
            outlier in 0.0f64..=0.1,
            count in 4usize..12,
        ) {
            let mut input: Vec<_> = (0..count)
                .map(|i| MinerResponse::new(format!("m{}", i), majority, "", vec![], 0.8, 0))
                .collect();
            input.push(MinerResponse::new("outlier", outlier, "", vec![], 0.8, 0));

            let aggregator = RobustAggregator::default_config();
            let assessment = aggregator.assess(&input).unwrap();

            prop_assert!(assessment.credibility_score >= 0.7 * majority);
            prop_assert_eq!(assessment.median, majority);
        }
    }
}
