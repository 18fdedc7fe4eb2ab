//! Configuration for the miner query dispatcher
//!
//! Selects live or simulated dispatch and tunes the live protocol.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Default responder network endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8091";

/// Where responder opinions come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Submit tasks to the responder network over HTTP
    #[default]
    Live,
    /// Synthesize opinions locally
    Simulated,
}

impl DispatchMode {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchMode::Live => "live",
            DispatchMode::Simulated => "simulated",
        }
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "live" => Some(DispatchMode::Live),
            "simulated" | "simulation" => Some(DispatchMode::Simulated),
            _ => None,
        }
    }
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the dispatcher
///
/// # Examples
///
/// ```
/// use credence_dispatch::{DispatchConfig, DispatchMode};
///
/// let config = DispatchConfig::default();
/// assert_eq!(config.mode, DispatchMode::Live);
/// assert!(config.fallback_to_simulation);
///
/// let config = DispatchConfig::simulated();
/// assert_eq!(config.mode, DispatchMode::Simulated);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Live network or local simulation
    #[serde(default)]
    pub mode: DispatchMode,

    /// Base URL of the responder network
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Bearer token sent with every live request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model or category identifier submitted with each task
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature requested from responders
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Upper bound on each responder's output size
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Delay between task status polls
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Minimum spacing between outbound requests
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// Timeout applied to each individual HTTP request
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Ceiling on the `max_responders` value submitted with a task
    #[serde(default = "default_max_responders_cap")]
    pub max_responders_cap: u32,

    /// Run the simulator when the live network is unreachable
    #[serde(default = "default_fallback")]
    pub fallback_to_simulation: bool,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    "credibility-v1".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_min_request_interval_ms() -> u64 {
    250
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_max_responders_cap() -> u32 {
    20
}

fn default_fallback() -> bool {
    true
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            mode: DispatchMode::default(),
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            poll_interval_ms: default_poll_interval_ms(),
            min_request_interval_ms: default_min_request_interval_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            max_responders_cap: default_max_responders_cap(),
            fallback_to_simulation: default_fallback(),
        }
    }
}

impl DispatchConfig {
    /// Simulation-only preset, never touches the network
    pub fn simulated() -> Self {
        Self {
            mode: DispatchMode::Simulated,
            fallback_to_simulation: false,
            ..Self::default()
        }
    }

    /// Live preset against `endpoint` with no fallback
    pub fn strict_live(endpoint: impl Into<String>) -> Self {
        Self {
            mode: DispatchMode::Live,
            endpoint: endpoint.into(),
            fallback_to_simulation: false,
            ..Self::default()
        }
    }

    /// Poll interval as a duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Minimum request spacing as a duration
    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }

    /// Per-request timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Number of responders to request as `max_responders` for a task
    ///
    /// Twice the minimum, capped, and never below the minimum.
    pub fn max_responders_for(&self, min_responders: u32) -> u32 {
        min_responders
            .saturating_mul(2)
            .min(self.max_responders_cap)
            .max(min_responders)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.mode == DispatchMode::Live || self.fallback_to_simulation {
            let url = Url::parse(&self.endpoint)
                .map_err(|e| format!("endpoint '{}' is not a valid URL: {}", self.endpoint, e))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(format!("endpoint scheme must be http or https (got {})", url.scheme()));
            }
        }
        if self.model.trim().is_empty() {
            return Err("model cannot be empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} out of range [0.0, 2.0]", self.temperature));
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be greater than 0".to_string());
        }
        if self.request_timeout_ms == 0 {
            return Err("request_timeout_ms must be greater than 0".to_string());
        }
        if self.max_responders_cap == 0 {
            return Err("max_responders_cap must be greater than 0".to_string());
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DispatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.min_request_interval(), Duration::from_millis(250));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_presets() {
        let simulated = DispatchConfig::simulated();
        assert!(simulated.validate().is_ok());
        assert!(!simulated.fallback_to_simulation);

        let live = DispatchConfig::strict_live("https://network.example");
        assert!(live.validate().is_ok());
        assert!(!live.fallback_to_simulation);
    }

    #[test]
    fn test_max_responders_for() {
        let config = DispatchConfig::default();
        assert_eq!(config.max_responders_for(3), 6);
        assert_eq!(config.max_responders_for(10), 20);
        assert_eq!(config.max_responders_for(15), 20);

        let mut config = DispatchConfig::default();
        config.max_responders_cap = 4;
        // Never below the minimum even when the cap is lower
        assert_eq!(config.max_responders_for(5), 5);
    }

    #[test]
    fn test_invalid_endpoint() {
        let mut config = DispatchConfig::default();
        config.endpoint = "not a url".to_string();
        assert!(config.validate().is_err());

        config.endpoint = "ftp://network.example".to_string();
        assert!(config.validate().is_err());

        // Endpoint is irrelevant for pure simulation
        config.mode = DispatchMode::Simulated;
        config.fallback_to_simulation = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_values() {
        let mut config = DispatchConfig::default();
        config.temperature = 3.0;
        assert!(config.validate().is_err());

        let mut config = DispatchConfig::default();
        config.poll_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = DispatchConfig::default();
        config.max_tokens = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(DispatchMode::parse("LIVE"), Some(DispatchMode::Live));
        assert_eq!(DispatchMode::parse("simulated"), Some(DispatchMode::Simulated));
        assert_eq!(DispatchMode::parse("simulation"), Some(DispatchMode::Simulated));
        assert_eq!(DispatchMode::parse("offline"), None);
        assert_eq!(DispatchMode::Simulated.to_string(), "simulated");
    }

    #[test]
    fn test_partial_toml() {
        let config = DispatchConfig::from_toml(
            r#"
            mode = "simulated"
            poll_interval_ms = 500
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, DispatchMode::Simulated);
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.fallback_to_simulation);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = DispatchConfig::default();
        config.api_key = Some("secret".to_string());
        let parsed = DispatchConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }
}
