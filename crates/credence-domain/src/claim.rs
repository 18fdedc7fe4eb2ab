//! Claim module - the unit of work fanned out to responders

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for one analysis, based on UUIDv7
///
/// UUIDv7 keeps identifiers chronologically sortable, which lets an external
/// history store order analyses without a separate timestamp column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnalysisId(u128);

impl AnalysisId {
    /// Generate a new UUIDv7-based AnalysisId
    ///
    /// # Examples
    ///
    /// ```
    /// use credence_domain::AnalysisId;
    ///
    /// let id = AnalysisId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create an AnalysisId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse an AnalysisId from its hyphenated string form
    ///
    /// # Examples
    ///
    /// ```
    /// use credence_domain::AnalysisId;
    ///
    /// let id = AnalysisId::new();
    /// let parsed = AnalysisId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid analysis id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Milliseconds since the Unix epoch encoded in the top 48 bits
    pub fn timestamp(&self) -> u64 {
        (self.0 >> 80) as u64
    }
}

impl Default for AnalysisId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl Serialize for AnalysisId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AnalysisId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        AnalysisId::from_string(&s).map_err(serde::de::Error::custom)
    }
}

/// What kind of input the claim text is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimKind {
    /// Free-form statement
    #[default]
    Text,
    /// A reference (URL) whose content is under evaluation
    #[serde(alias = "url")]
    Reference,
}

impl ClaimKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimKind::Text => "text",
            ClaimKind::Reference => "reference",
        }
    }

    /// Parse a kind, accepting `url` as an alias for `reference`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Some(ClaimKind::Text),
            "reference" | "url" => Some(ClaimKind::Reference),
            _ => None,
        }
    }
}

impl fmt::Display for ClaimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A claim submitted for credibility analysis
///
/// Immutable once constructed. The constructor enforces that the claim is
/// non-empty and that at least one responder is requested; bounding the
/// timeout to a sane range is the job of the caller-facing boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimQuery {
    claim: String,
    kind: ClaimKind,
    min_responders: u32,
    timeout_ms: u64,
}

impl ClaimQuery {
    /// Create a new claim query
    ///
    /// # Examples
    ///
    /// ```
    /// use credence_domain::{ClaimKind, ClaimQuery};
    ///
    /// let query = ClaimQuery::new("Water boils at 100C at sea level", ClaimKind::Text, 3, 30_000).unwrap();
    /// assert_eq!(query.min_responders(), 3);
    ///
    /// assert!(ClaimQuery::new("x", ClaimKind::Text, 0, 30_000).is_err());
    /// ```
    pub fn new(
        claim: impl Into<String>,
        kind: ClaimKind,
        min_responders: u32,
        timeout_ms: u64,
    ) -> Result<Self, String> {
        let claim = claim.into();
        if claim.trim().is_empty() {
            return Err("claim must not be empty".to_string());
        }
        if min_responders == 0 {
            return Err("min_responders must be at least 1".to_string());
        }
        if timeout_ms == 0 {
            return Err("timeout_ms must be greater than 0".to_string());
        }

        Ok(Self {
            claim,
            kind,
            min_responders,
            timeout_ms,
        })
    }

    /// The claim text
    pub fn claim(&self) -> &str {
        &self.claim
    }

    /// The claim kind
    pub fn kind(&self) -> ClaimKind {
        self.kind
    }

    /// Number of independent responses requested
    pub fn min_responders(&self) -> u32 {
        self.min_responders
    }

    /// Total wall-clock budget for dispatch, in milliseconds
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Total wall-clock budget for dispatch
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_id_ordering() {
        let id1 = AnalysisId::from_value(1000);
        let id2 = AnalysisId::from_value(2000);

        assert!(id1 < id2);
    }

    #[test]
    fn test_analysis_id_chronological() {
        let id1 = AnalysisId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = AnalysisId::new();

        assert!(id1 < id2, "Earlier UUIDv7 should be less than later UUIDv7");
        assert!(id1.timestamp() <= id2.timestamp());
    }

    #[test]
    fn test_analysis_id_serde() {
        let id = AnalysisId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json.len(), 38); // 36 chars plus quotes

        let parsed: AnalysisId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_analysis_id_invalid_string() {
        assert!(AnalysisId::from_string("not-a-valid-uuid").is_err());
        assert!(AnalysisId::from_string("").is_err());
    }

    #[test]
    fn test_claim_kind_parse() {
        assert_eq!(ClaimKind::parse("text"), Some(ClaimKind::Text));
        assert_eq!(ClaimKind::parse("URL"), Some(ClaimKind::Reference));
        assert_eq!(ClaimKind::parse("reference"), Some(ClaimKind::Reference));
        assert_eq!(ClaimKind::parse("image"), None);
    }

    #[test]
    fn test_claim_kind_serde_alias() {
        let kind: ClaimKind = serde_json::from_str("\"url\"").unwrap();
        assert_eq!(kind, ClaimKind::Reference);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"reference\"");
    }

    #[test]
    fn test_claim_query_invariants() {
        assert!(ClaimQuery::new("", ClaimKind::Text, 3, 30_000).is_err());
        assert!(ClaimQuery::new("   ", ClaimKind::Text, 3, 30_000).is_err());
        assert!(ClaimQuery::new("claim", ClaimKind::Text, 0, 30_000).is_err());
        assert!(ClaimQuery::new("claim", ClaimKind::Text, 1, 0).is_err());

        let query = ClaimQuery::new("claim", ClaimKind::Reference, 1, 5_000).unwrap();
        assert_eq!(query.claim(), "claim");
        assert_eq!(query.kind(), ClaimKind::Reference);
        assert_eq!(query.timeout(), std::time::Duration::from_millis(5_000));
    }
}
