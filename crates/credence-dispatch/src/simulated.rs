//! Local synthesis of responder payloads
//!
//! Used for development and as the fallback when the live network is
//! unreachable. Output is reproducible per claim: the PRNG is seeded from the
//! claim text, and the payloads take the same validation path as live ones.

use crate::config::DispatchMode;
use crate::{DispatchError, DispatchStrategy};
use async_trait::async_trait;
use credence_domain::{ClaimKind, ClaimQuery};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

/// Per-responder deviation from the claim's base score
const SCORE_JITTER: f64 = 0.15;

/// Well-known sources a simulated responder may cite
const SOURCE_POOL: &[&str] = &[
    "https://www.reuters.com/fact-check",
    "https://apnews.com/hub/fact-checking",
    "https://www.bbc.com/news/reality_check",
    "https://en.wikipedia.org/wiki/Main_Page",
    "https://www.britannica.com",
    "https://www.nature.com",
    "https://www.who.int",
    "https://www.cdc.gov",
    "https://pubmed.ncbi.nlm.nih.gov",
    "https://www.snopes.com",
    "https://www.factcheck.org",
    "https://www.politifact.com",
];

const ABSOLUTE_CUES: &[&str] = &[
    "always", "never", "everyone", "nobody", "guaranteed", "miracle", "cure", "secret",
    "shocking", "100%", "proven",
];

const HEDGED_CUES: &[&str] = &[
    "might", "may", "could", "possibly", "allegedly", "reportedly", "rumor", "rumored",
];

const EVIDENTIAL_CUES: &[&str] = &[
    "study", "studies", "research", "data", "published", "survey", "report", "according",
    "percent", "measured", "census",
];

const SUPPORTIVE_PHRASES: &[&str] = &[
    "Multiple reliable sources corroborate the central statement.",
    "The claim agrees with official data published by relevant authorities.",
    "Findings consistent with the claim have passed peer review.",
    "There is broad scientific consensus in line with this claim.",
    "Expert opinion largely supports the claim as stated.",
    "Statistical evidence from independent surveys points the same way.",
];

const MIXED_PHRASES: &[&str] = &[
    "Sources contain contradictory information on the specifics.",
    "Some details appear outdated, although the core may hold.",
    "Expert opinion is divided and the primary source is ambiguous.",
    "Parts of the claim are unverified while others check out.",
    "The historical record supports only a narrower version of the claim.",
];

const SKEPTICAL_PHRASES: &[&str] = &[
    "The claim lacks evidence from any reliable sources.",
    "Framing is misleading and omits essential context.",
    "A fact-check by independent organizations disputes the claim.",
    "The supporting figures are unverified and cannot be traced to a primary source.",
    "Official data contradicts the numbers cited in the claim.",
];

/// Deterministic simulation strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedDispatch;

impl SimulatedDispatch {
    /// Create a simulator
    pub fn new() -> Self {
        Self
    }

    /// Synthesize exactly `query.min_responders()` raw payloads
    pub fn payloads(&self, query: &ClaimQuery) -> Vec<Value> {
        let mut rng = StdRng::seed_from_u64(seed_for(query.claim()));
        let base = base_score(query);

        debug!(
            "Simulating {} responders around base score {:.2}",
            query.min_responders(),
            base
        );

        (0..query.min_responders())
            .map(|i| {
                let score = (base + rng.gen_range(-SCORE_JITTER..=SCORE_JITTER)).clamp(0.0, 1.0);
                let confidence: f64 = rng.gen_range(0.55..=0.95);
                let source_count = rng.gen_range(1..=3);
                let sources: Vec<&str> = SOURCE_POOL
                    .choose_multiple(&mut rng, source_count)
                    .copied()
                    .collect();

                json!({
                    "responder_id": format!("simulated-{}", i + 1),
                    "score": score,
                    "confidence": confidence,
                    "reasoning": reasoning_for(score, &mut rng),
                    "sources": sources,
                    "processing_time_ms": rng.gen_range(400..=3_000u64),
                })
            })
            .collect()
    }
}

#[async_trait]
impl DispatchStrategy for SimulatedDispatch {
    async fn fetch(&self, query: &ClaimQuery) -> Result<Vec<Value>, DispatchError> {
        Ok(self.payloads(query))
    }

    fn mode(&self) -> DispatchMode {
        DispatchMode::Simulated
    }
}

/// FNV-1a over the claim bytes; stable across runs and platforms
///
/// `DefaultHasher` output may change between Rust releases, so it cannot seed
/// reproducible simulations.
fn seed_for(claim: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    claim
        .trim()
        .bytes()
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}

/// Base credibility from lexical cues, in `[0.1, 0.9]`
fn base_score(query: &ClaimQuery) -> f64 {
    let text = query.claim().to_lowercase();
    let words: Vec<&str> = text
        .split(|c: char| !(c.is_alphanumeric() || c == '%'))
        .filter(|w| !w.is_empty())
        .collect();
    let count = |cues: &[&str]| words.iter().filter(|w| cues.contains(*w)).count() as f64;

    let mut score = 0.55 + 0.08 * count(EVIDENTIAL_CUES)
        - 0.12 * count(ABSOLUTE_CUES)
        - 0.06 * count(HEDGED_CUES);

    if query.kind() == ClaimKind::Reference {
        score += reference_adjustment(query.claim());
    }

    score.clamp(0.1, 0.9)
}

/// References to well-known outlets start higher; unparseable ones lower
fn reference_adjustment(reference: &str) -> f64 {
    match Url::parse(reference.trim()) {
        Ok(url) => {
            let host = url.host_str().unwrap_or_default();
            let known = SOURCE_POOL.iter().any(|source| {
                Url::parse(source)
                    .ok()
                    .and_then(|s| s.host_str().map(|h| h.trim_start_matches("www.").to_string()))
                    .is_some_and(|h| host.trim_start_matches("www.") == h)
            });
            if known {
                0.15
            } else {
                0.0
            }
        }
        Err(_) => -0.1,
    }
}

fn reasoning_for(score: f64, rng: &mut StdRng) -> String {
    let phrases = if score >= 0.6 {
        SUPPORTIVE_PHRASES
    } else if score > 0.4 {
        MIXED_PHRASES
    } else {
        SKEPTICAL_PHRASES
    };

    phrases
        .choose_multiple(rng, 2)
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
