//! Supporting source deduplication and ranking

use crate::config::AggregationConfig;
use credence_domain::{MinerResponse, SupportingSource};
use std::collections::HashMap;
use url::Url;

/// Longest fallback excerpt when no sentence qualifies
const MAX_FALLBACK_EXCERPT_CHARS: usize = 200;

/// Titles for well-known domains; more specific hosts first
const KNOWN_DOMAINS: &[(&str, &str)] = &[
    ("pubmed.ncbi.nlm.nih.gov", "PubMed"),
    ("scholar.google.com", "Google Scholar"),
    ("wikipedia.org", "Wikipedia"),
    ("britannica.com", "Encyclopaedia Britannica"),
    ("reuters.com", "Reuters"),
    ("apnews.com", "Associated Press"),
    ("bbc.com", "BBC News"),
    ("bbc.co.uk", "BBC News"),
    ("nytimes.com", "The New York Times"),
    ("theguardian.com", "The Guardian"),
    ("nature.com", "Nature"),
    ("science.org", "Science"),
    ("who.int", "World Health Organization"),
    ("cdc.gov", "Centers for Disease Control and Prevention"),
    ("nih.gov", "National Institutes of Health"),
    ("nasa.gov", "NASA"),
    ("snopes.com", "Snopes"),
    ("factcheck.org", "FactCheck.org"),
    ("politifact.com", "PolitiFact"),
];

/// Merges cited URLs across responses and ranks them by credibility
#[derive(Debug, Clone)]
pub struct SourceRanker {
    max_sources: usize,
    min_excerpt_chars: usize,
}

impl SourceRanker {
    /// Create a ranker from the aggregation configuration
    pub fn new(config: &AggregationConfig) -> Self {
        Self {
            max_sources: config.max_sources,
            min_excerpt_chars: config.min_excerpt_chars,
        }
    }

    /// Merge, rank and cap the sources cited by `responses`
    ///
    /// The first citation of a URL sets its credibility to the citing
    /// response's score. Every later citation replaces it with
    /// `(existing + score) / 2`, so recent citations weigh more than a true
    /// running mean would give them.
    pub fn rank(&self, responses: &[MinerResponse]) -> Vec<SupportingSource> {
        let mut merged: Vec<SupportingSource> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for response in responses {
            for url in response.sources() {
                match index.get(url.as_str()) {
                    Some(&slot) => {
                        let source = &mut merged[slot];
                        source.credibility = (source.credibility + response.score()) / 2.0;
                    }
                    None => {
                        let domain = domain_of(url);
                        index.insert(url.as_str(), merged.len());
                        merged.push(SupportingSource {
                            url: url.clone(),
                            title: title_for(&domain),
                            credibility: response.score(),
                            excerpt: excerpt_from(response.reasoning(), self.min_excerpt_chars),
                            domain,
                        });
                    }
                }
            }
        }

        // Stable: equal credibility keeps first-citation order
        merged.sort_by(|a, b| b.credibility.total_cmp(&a.credibility));
        merged.truncate(self.max_sources);
        merged
    }
}

impl Default for SourceRanker {
    fn default() -> Self {
        Self::new(&AggregationConfig::default())
    }
}

/// Host of `url` without a leading `www.`
///
/// Falls back to the raw input when it does not parse as an absolute URL
/// with a host.
///
/// # Examples
///
/// ```
/// use credence_aggregator::domain_of;
///
/// assert_eq!(domain_of("https://www.reuters.com/world/story"), "reuters.com");
/// assert_eq!(domain_of("https://en.wikipedia.org/wiki/Moon"), "en.wikipedia.org");
/// ```
pub fn domain_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_lowercase))
        .map(|host| match host.strip_prefix("www.") {
            Some(bare) => bare.to_string(),
            None => host.clone(),
        })
        .unwrap_or_else(|| url.to_string())
}

fn title_for(domain: &str) -> String {
    KNOWN_DOMAINS
        .iter()
        .find(|(known, _)| domain == *known || domain.ends_with(&format!(".{}", known)))
        .map(|(_, title)| title.to_string())
        .unwrap_or_else(|| format!("{} - Source Verification", domain))
}

/// First sentence longer than `min_chars`, else the truncated reasoning
fn excerpt_from(reasoning: &str, min_chars: usize) -> String {
    let sentence = reasoning
        .split_inclusive(|c: char| matches!(c, '.' | '!' | '?'))
        .map(str::trim)
        .find(|s| s.chars().count() > min_chars);

    match sentence {
        Some(s) => s.to_string(),
        None => reasoning.trim().chars().take(MAX_FALLBACK_EXCERPT_CHARS).collect(),
    }
}
