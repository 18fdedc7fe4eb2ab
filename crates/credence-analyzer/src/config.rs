//! Configuration for the Analyzer

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request bounds and defaults applied at the analyze boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Maximum claim length after trimming (characters)
    pub max_claim_chars: usize,

    /// Responders requested when the caller does not say
    pub default_min_responders: u32,

    /// Smallest responder count a caller may request
    pub min_responders_floor: u32,

    /// Largest responder count a caller may request
    pub min_responders_ceiling: u32,

    /// Dispatch deadline when the caller does not say (milliseconds)
    pub default_timeout_ms: u64,

    /// Shortest deadline a caller may request (milliseconds)
    pub min_timeout_ms: u64,

    /// Longest deadline a caller may request (milliseconds)
    pub max_timeout_ms: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_claim_chars: 2000,
            default_min_responders: 3,
            min_responders_floor: 1,
            min_responders_ceiling: 20,
            default_timeout_ms: 30_000,
            min_timeout_ms: 5_000,
            max_timeout_ms: 60_000,
        }
    }
}

impl AnalyzerConfig {
    /// Quick preset: fewer responders and a shorter default deadline
    pub fn quick() -> Self {
        Self {
            default_min_responders: 3,
            default_timeout_ms: 10_000,
            ..Self::default()
        }
    }

    /// Thorough preset: more responders and the longest default deadline
    pub fn thorough() -> Self {
        Self {
            default_min_responders: 10,
            default_timeout_ms: 60_000,
            ..Self::default()
        }
    }

    /// Default deadline as a Duration
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_claim_chars == 0 {
            return Err("max_claim_chars must be greater than 0".to_string());
        }
        if self.min_responders_floor == 0 {
            return Err("min_responders_floor must be at least 1".to_string());
        }
        if self.min_responders_floor > self.min_responders_ceiling {
            return Err("min_responders_floor cannot exceed min_responders_ceiling".to_string());
        }
        if !(self.min_responders_floor..=self.min_responders_ceiling)
            .contains(&self.default_min_responders)
        {
            return Err(format!(
                "default_min_responders {} outside [{}, {}]",
                self.default_min_responders, self.min_responders_floor, self.min_responders_ceiling
            ));
        }
        if self.min_timeout_ms == 0 {
            return Err("min_timeout_ms must be greater than 0".to_string());
        }
        if self.min_timeout_ms > self.max_timeout_ms {
            return Err("min_timeout_ms cannot exceed max_timeout_ms".to_string());
        }
        if !(self.min_timeout_ms..=self.max_timeout_ms).contains(&self.default_timeout_ms) {
            return Err(format!(
                "default_timeout_ms {} outside [{}, {}]",
                self.default_timeout_ms, self.min_timeout_ms, self.max_timeout_ms
            ));
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
