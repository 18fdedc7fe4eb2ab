//! Consensus narrative generation
//!
//! A templated rationale keyed off the credibility band, plus a bag-of-terms
//! scan for recurring themes. Cheap and explainable; not semantic analysis.

use crate::config::{AggregationConfig, CredibilityBands};
use credence_domain::MinerResponse;

/// Domain terms recognized as reasoning themes, in tie-break order
pub const THEME_VOCABULARY: &[&str] = &[
    "reliable sources",
    "contradictory information",
    "peer review",
    "scientific consensus",
    "expert opinion",
    "official data",
    "primary source",
    "statistical evidence",
    "historical record",
    "lacks evidence",
    "misleading",
    "outdated",
    "unverified",
    "fact-check",
];

/// Builds the human-readable consensus text
#[derive(Debug, Clone)]
pub struct ConsensusNarrator {
    bands: CredibilityBands,
    high_score_threshold: f64,
    low_score_threshold: f64,
    max_themes: usize,
}

impl ConsensusNarrator {
    /// Create a narrator from the aggregation configuration
    pub fn new(config: &AggregationConfig) -> Self {
        Self {
            bands: config.bands,
            high_score_threshold: config.high_score_threshold,
            low_score_threshold: config.low_score_threshold,
            max_themes: config.max_themes,
        }
    }

    /// Produce the consensus text for `responses` at `credibility_score`
    pub fn narrate(&self, responses: &[MinerResponse], credibility_score: f64) -> String {
        let high = responses
            .iter()
            .filter(|r| r.score() >= self.high_score_threshold)
            .count();
        let low = responses
            .iter()
            .filter(|r| r.score() <= self.low_score_threshold)
            .count();

        let mut text = format!(
            "{} {} {} evaluated the claim: {} reported high credibility and {} reported low credibility.",
            self.band_sentence(credibility_score),
            responses.len(),
            if responses.len() == 1 { "responder" } else { "responders" },
            high,
            low,
        );

        let themes = self.themes(responses);
        if !themes.is_empty() {
            text.push_str(&format!(" Recurring themes: {}.", themes.join(", ")));
        }

        text
    }

    /// Most frequent vocabulary terms across responses, at most `max_themes`
    ///
    /// Frequency is the number of responses whose reasoning mentions the term
    /// (case-insensitive). Ties keep vocabulary order.
    pub fn themes(&self, responses: &[MinerResponse]) -> Vec<&'static str> {
        let lowered: Vec<String> = responses.iter().map(|r| r.reasoning().to_lowercase()).collect();

        let mut counts: Vec<(&'static str, usize)> = THEME_VOCABULARY
            .iter()
            .map(|&term| (term, lowered.iter().filter(|text| text.contains(term)).count()))
            .filter(|&(_, count)| count > 0)
            .collect();

        // Stable sort keeps vocabulary order among equal counts
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        counts
            .into_iter()
            .take(self.max_themes)
            .map(|(term, _)| term)
            .collect()
    }

    fn band_sentence(&self, score: f64) -> &'static str {
        if score >= self.bands.strong {
            "Strong consensus supports the credibility of this claim."
        } else if score >= self.bands.credible {
            "The claim is generally considered credible."
        } else if score >= self.bands.mixed {
            "Responders hold mixed views on the credibility of this claim."
        } else if score >= self.bands.low {
            "The claim has low credibility according to most responders."
        } else {
            "The claim has very low credibility; responders largely reject it."
        }
    }
}

impl Default for ConsensusNarrator {
    fn default() -> Self {
        Self::new(&AggregationConfig::default())
    }
}
