//! Configuration management for the CLI.
//!
//! One TOML file carries every section; missing sections and keys fall back
//! to their defaults:
//!
//! ```toml
//! [dispatch]
//! mode = "simulated"
//!
//! [aggregation]
//! credible_threshold = 0.65
//!
//! [analyzer]
//! default_min_responders = 5
//!
//! [output]
//! format = "json"
//! ```

use crate::error::{CliError, Result};
use credence_aggregator::AggregationConfig;
use credence_analyzer::{Analyzer, AnalyzerConfig};
use credence_dispatch::{DispatchConfig, DispatchMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredenceConfig {
    /// How claims reach responders
    pub dispatch: DispatchConfig,

    /// How responses are reduced to a verdict
    pub aggregation: AggregationConfig,

    /// Request defaults and bounds
    pub analyzer: AnalyzerConfig,

    /// Output settings
    pub output: Settings,
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl CredenceConfig {
    /// Per-user configuration file, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("credence").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the per-user file is read
    /// when present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_file(&path),
                _ => {
                    debug!("No configuration file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from TOML.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.dispatch
            .validate()
            .map_err(|e| CliError::Config(format!("[dispatch] {}", e)))?;
        self.aggregation
            .validate()
            .map_err(|e| CliError::Config(format!("[aggregation] {}", e)))?;
        self.analyzer
            .validate()
            .map_err(|e| CliError::Config(format!("[analyzer] {}", e)))?;
        Ok(())
    }

    /// Override the dispatch mode.
    pub fn with_mode(mut self, mode: DispatchMode) -> Self {
        self.dispatch.mode = mode;
        self
    }

    /// Build the analyzer described by this configuration.
    pub fn build_analyzer(&self) -> Result<Analyzer> {
        Ok(Analyzer::new(
            self.analyzer.clone(),
            self.dispatch.clone(),
            self.aggregation.clone(),
        )?)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Text,
        }
    }
}

fn default_true() -> bool {
    true
}
