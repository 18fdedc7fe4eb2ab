//! Normalize raw responder payloads into [`MinerResponse`]s
//!
//! Responders are untrusted and their output is loosely shaped. Field-level
//! problems are repaired with defaults; a payload that is not an object at
//! all is replaced by a low-confidence neutral response so one bad element
//! never sinks the batch.

use credence_domain::{MinerResponse, NEUTRAL_SCORE};
use serde_json::{Map, Value};
use tracing::warn;
use url::Url;

/// Confidence assigned to a recovered payload
pub const RECOVERED_CONFIDENCE: f64 = 0.1;

/// Reasoning used when a payload carries none
pub const NO_REASONING: &str = "No reasoning provided";

/// Keys that may carry the responder identifier, in priority order
const ID_KEYS: &[&str] = &["responder_id", "miner_uid", "uid", "hotkey"];

/// Keys that may wrap the actual payload
const ENVELOPE_KEYS: &[&str] = &["response", "output"];

/// Outcome of validating one raw payload
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedResponse {
    /// The payload was an object; individual fields may have been defaulted
    Clean(MinerResponse),
    /// The payload was unusable and replaced by the neutral fallback
    Recovered(MinerResponse),
}

impl ValidatedResponse {
    /// The normalized response
    pub fn response(&self) -> &MinerResponse {
        match self {
            ValidatedResponse::Clean(r) | ValidatedResponse::Recovered(r) => r,
        }
    }

    /// Consume into the normalized response
    pub fn into_response(self) -> MinerResponse {
        match self {
            ValidatedResponse::Clean(r) | ValidatedResponse::Recovered(r) => r,
        }
    }

    /// Whether the fallback was substituted
    pub fn is_recovered(&self) -> bool {
        matches!(self, ValidatedResponse::Recovered(_))
    }
}

/// Stateless payload validator
///
/// # Examples
///
/// ```
/// use credence_dispatch::ResponseValidator;
/// use serde_json::json;
///
/// let validator = ResponseValidator::new();
///
/// let clean = validator.validate(&json!({"score": 2.0, "confidence": "0.8"}), 0);
/// assert_eq!(clean.response().score(), 1.0);
/// assert_eq!(clean.response().confidence(), 0.8);
///
/// let recovered = validator.validate(&json!(null), 1);
/// assert!(recovered.is_recovered());
/// assert_eq!(recovered.response().confidence(), 0.1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseValidator;

impl ResponseValidator {
    /// Create a validator
    pub fn new() -> Self {
        Self
    }

    /// Validate the payload at position `index` of a batch
    pub fn validate(&self, raw: &Value, index: usize) -> ValidatedResponse {
        match payload_object(raw) {
            Ok(object) => ValidatedResponse::Clean(normalize(&object, index)),
            Err(reason) => {
                warn!("Responder payload {} is malformed, substituting fallback: {}", index, reason);
                ValidatedResponse::Recovered(fallback(index, &reason))
            }
        }
    }

    /// Validate every element of a batch in order
    pub fn validate_all(&self, raw: &[Value]) -> Vec<ValidatedResponse> {
        raw.iter()
            .enumerate()
            .map(|(index, payload)| self.validate(payload, index))
            .collect()
    }
}

/// Resolve the payload to a JSON object, unwrapping text and envelopes
fn payload_object(raw: &Value) -> Result<Map<String, Value>, String> {
    let value = match raw {
        Value::String(text) => parse_embedded(text)?,
        other => other.clone(),
    };

    let mut object = match value {
        Value::Object(object) => object,
        other => return Err(format!("expected a JSON object, got {}", type_name(&other))),
    };

    if object.contains_key("score") {
        return Ok(object);
    }

    for key in ENVELOPE_KEYS {
        let inner = match object.get(*key) {
            Some(Value::Object(inner)) => Some(inner.clone()),
            Some(Value::String(text)) => match parse_embedded(text) {
                Ok(Value::Object(inner)) => Some(inner),
                _ => None,
            },
            _ => None,
        };

        if let Some(mut inner) = inner {
            object.remove(*key);
            // Envelope metadata (ids, timings) fills gaps in the inner payload
            for (k, v) in object {
                inner.entry(k).or_insert(v);
            }
            return Ok(inner);
        }
    }

    Ok(object)
}

/// Parse JSON carried as text, tolerating markdown code fences
fn parse_embedded(text: &str) -> Result<Value, String> {
    let json = strip_code_fence(text);
    if json.is_empty() {
        return Err("empty payload".to_string());
    }
    serde_json::from_str(json).map_err(|e| format!("JSON parse error: {}", e))
}

/// Strip a surrounding ```` ``` ```` / ```` ```json ```` block, if any
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Skip the info string on the opening line
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn normalize(object: &Map<String, Value>, index: usize) -> MinerResponse {
    let responder_id = ID_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(id_text))
        .unwrap_or_else(|| format!("responder-{}", index));

    let score = object.get("score").and_then(number).unwrap_or(NEUTRAL_SCORE);
    let confidence = object.get("confidence").and_then(number).unwrap_or(NEUTRAL_SCORE);

    let reasoning = object
        .get("reasoning")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(NO_REASONING);

    let sources = object.get("sources").map(collect_sources).unwrap_or_default();

    MinerResponse::new(
        responder_id,
        score,
        reasoning,
        sources,
        confidence,
        processing_time_ms(object),
    )
}

fn fallback(index: usize, reason: &str) -> MinerResponse {
    MinerResponse::new(
        format!("responder-{}", index),
        NEUTRAL_SCORE,
        format!("Response could not be parsed ({}); neutral fallback substituted", reason),
        Vec::new(),
        RECOVERED_CONFIDENCE,
        0,
    )
}

/// A JSON number or numeric string; `None` for anything else
///
/// NaN survives here and is defaulted by [`MinerResponse::new`].
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn processing_time_ms(object: &Map<String, Value>) -> u64 {
    let millis = object
        .get("processing_time_ms")
        .and_then(number)
        .or_else(|| object.get("processing_time").and_then(number).map(|secs| secs * 1000.0));

    match millis {
        Some(ms) if ms.is_finite() && ms > 0.0 => ms.round() as u64,
        _ => 0,
    }
}

/// Absolute http(s) URLs, deduplicated in citation order
fn collect_sources(value: &Value) -> Vec<String> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    let mut sources: Vec<String> = Vec::new();
    for item in items {
        let candidate = match item {
            Value::String(s) => Some(s.as_str()),
            Value::Object(o) => o.get("url").and_then(Value::as_str),
            _ => None,
        };
        let Some(candidate) = candidate.map(str::trim) else {
            continue;
        };

        match Url::parse(candidate) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
                if !sources.iter().any(|s| s == candidate) {
                    sources.push(candidate.to_string());
                }
            }
            _ => {}
        }
    }
    sources
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
