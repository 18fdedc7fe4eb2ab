//! Dispatch counters and health reporting

use crate::config::DispatchMode;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time copy of the dispatcher counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchMetrics {
    /// Dispatch calls started
    pub dispatches: u64,
    /// Live tasks that completed with responses
    pub live_completions: u64,
    /// Simulation runs, including fallbacks
    pub simulated_runs: u64,
    /// Live calls that fell back to simulation
    pub fallbacks: u64,
    /// Calls that hit their deadline
    pub timeouts: u64,
    /// Calls that ended in any other error
    pub failures: u64,
    /// Payloads replaced by the neutral fallback
    pub recovered_responses: u64,
}

impl DispatchMetrics {
    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        [
            "Dispatch Metrics Summary".to_string(),
            "========================".to_string(),
            format!("Dispatches: {}", self.dispatches),
            format!("Live completions: {}", self.live_completions),
            format!("Simulated runs: {}", self.simulated_runs),
            format!("Fallbacks: {}", self.fallbacks),
            format!("Timeouts: {}", self.timeouts),
            format!("Failures: {}", self.failures),
            format!("Recovered responses: {}", self.recovered_responses),
        ]
        .join("\n")
    }
}

/// Atomic counters owned by one dispatcher instance
#[derive(Debug, Default)]
pub(crate) struct MetricsRecorder {
    dispatches: AtomicU64,
    live_completions: AtomicU64,
    simulated_runs: AtomicU64,
    fallbacks: AtomicU64,
    timeouts: AtomicU64,
    failures: AtomicU64,
    recovered_responses: AtomicU64,
}

impl MetricsRecorder {
    pub(crate) fn record_dispatch(&self) {
        self.dispatches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_live_completion(&self) {
        self.live_completions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_simulated_run(&self) {
        self.simulated_runs.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_recovered(&self, count: u64) {
        self.recovered_responses.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> DispatchMetrics {
        DispatchMetrics {
            dispatches: self.dispatches.load(Ordering::Relaxed),
            live_completions: self.live_completions.load(Ordering::Relaxed),
            simulated_runs: self.simulated_runs.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            recovered_responses: self.recovered_responses.load(Ordering::Relaxed),
        }
    }
}

/// Health report of a dispatcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// Mode chosen at construction
    pub mode: DispatchMode,
    /// Whether transport errors fall back to simulation
    pub fallback_enabled: bool,
    /// Responder count seen by the last completed dispatch or probe
    pub last_known_responders: Option<u64>,
    /// Counter snapshot
    pub metrics: DispatchMetrics,
}
