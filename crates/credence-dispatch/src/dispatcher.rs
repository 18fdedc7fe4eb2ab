//! Miner query dispatcher: strategy selection, fallback and validation

use crate::config::{DispatchConfig, DispatchMode};
use crate::live::LiveDispatch;
use crate::metrics::{HealthStatus, MetricsRecorder};
use crate::simulated::SimulatedDispatch;
use crate::validator::{ResponseValidator, ValidatedResponse};
use crate::{DispatchError, DispatchStrategy};
use credence_domain::{ClaimQuery, MinerResponse};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};

/// Validated responses of one dispatch and where they came from
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    /// One entry per raw payload, in arrival order
    pub responses: Vec<ValidatedResponse>,
    /// Mode that actually produced the payloads
    pub mode: DispatchMode,
    /// Whether a live call fell back to simulation
    pub fell_back: bool,
}

impl DispatchOutcome {
    /// Number of payloads replaced by the neutral fallback
    pub fn recovered_count(&self) -> usize {
        self.responses.iter().filter(|r| r.is_recovered()).count()
    }

    /// Consume into plain responses
    pub fn into_responses(self) -> Vec<MinerResponse> {
        self.responses
            .into_iter()
            .map(ValidatedResponse::into_response)
            .collect()
    }
}

/// Collects responder opinions for claims
///
/// The strategy is fixed at construction. When the live network is
/// unreachable and `fallback_to_simulation` is set, the call is served by
/// the simulator instead; timeouts and task failures always propagate.
pub struct MinerQueryDispatcher {
    config: DispatchConfig,
    strategy: Box<dyn DispatchStrategy>,
    simulator: SimulatedDispatch,
    validator: ResponseValidator,
    metrics: MetricsRecorder,
    // Responder count plus one; zero means unknown
    last_known_responders: AtomicU64,
}

impl MinerQueryDispatcher {
    /// Create a dispatcher for the mode in `config`
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Config`] if the configuration is invalid.
    pub fn new(config: DispatchConfig) -> Result<Self, DispatchError> {
        config.validate().map_err(DispatchError::Config)?;

        let strategy: Box<dyn DispatchStrategy> = match config.mode {
            DispatchMode::Live => Box::new(LiveDispatch::new(config.clone())?),
            DispatchMode::Simulated => Box::new(SimulatedDispatch::new()),
        };

        Ok(Self::with_strategy(config, strategy))
    }

    /// Create a dispatcher around a caller-supplied strategy
    pub fn with_strategy(config: DispatchConfig, strategy: Box<dyn DispatchStrategy>) -> Self {
        Self {
            config,
            strategy,
            simulator: SimulatedDispatch::new(),
            validator: ResponseValidator::new(),
            metrics: MetricsRecorder::default(),
            last_known_responders: AtomicU64::new(0),
        }
    }

    /// Mode chosen at construction
    pub fn mode(&self) -> DispatchMode {
        self.strategy.mode()
    }

    /// Active configuration
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Collect normalized responses for `query`
    ///
    /// # Errors
    ///
    /// See [`MinerQueryDispatcher::dispatch_detailed`].
    pub async fn dispatch(&self, query: &ClaimQuery) -> Result<Vec<MinerResponse>, DispatchError> {
        Ok(self.dispatch_detailed(query).await?.into_responses())
    }

    /// Collect validated responses for `query`, with provenance
    ///
    /// # Errors
    ///
    /// - [`DispatchError::Timeout`] when the deadline expires
    /// - [`DispatchError::Transport`] when the network is unreachable and
    ///   fallback is disabled
    /// - [`DispatchError::TaskFailed`] / [`DispatchError::InvalidResponse`]
    ///   as reported by the live network
    pub async fn dispatch_detailed(&self, query: &ClaimQuery) -> Result<DispatchOutcome, DispatchError> {
        self.metrics.record_dispatch();
        let mode = self.strategy.mode();

        info!(
            "Dispatching {} claim ({} chars) to {} responders, mode {}",
            query.kind(),
            query.claim().chars().count(),
            query.min_responders(),
            mode
        );

        let (payloads, mode, fell_back) = match self.strategy.fetch(query).await {
            Ok(payloads) => {
                match mode {
                    DispatchMode::Live => {
                        self.metrics.record_live_completion();
                        self.last_known_responders
                            .store(payloads.len() as u64 + 1, Ordering::Relaxed);
                    }
                    DispatchMode::Simulated => self.metrics.record_simulated_run(),
                }
                (payloads, mode, false)
            }
            Err(e) if e.is_transport() && self.config.fallback_to_simulation && mode == DispatchMode::Live => {
                warn!("Live dispatch failed, falling back to simulation: {}", e);
                self.metrics.record_fallback();
                self.metrics.record_simulated_run();
                (self.simulator.payloads(query), DispatchMode::Simulated, true)
            }
            Err(e) => {
                match e {
                    DispatchError::Timeout(_) => self.metrics.record_timeout(),
                    _ => self.metrics.record_failure(),
                }
                warn!("Dispatch failed: {}", e);
                return Err(e);
            }
        };

        let responses = self.validator.validate_all(&payloads);
        let outcome = DispatchOutcome {
            responses,
            mode,
            fell_back,
        };

        let recovered = outcome.recovered_count();
        if recovered > 0 {
            warn!("{} of {} payloads were malformed and recovered", recovered, outcome.responses.len());
            self.metrics.record_recovered(recovered as u64);
        }

        Ok(outcome)
    }

    /// Ask the strategy how many responders are reachable
    ///
    /// A known count is remembered for [`MinerQueryDispatcher::health`].
    pub async fn probe(&self) -> Result<Option<u64>, DispatchError> {
        let count = self.strategy.probe().await?;
        if let Some(n) = count {
            self.last_known_responders.store(n.saturating_add(1), Ordering::Relaxed);
        }
        Ok(count)
    }

    /// Current health report
    pub fn health(&self) -> HealthStatus {
        let stored = self.last_known_responders.load(Ordering::Relaxed);
        HealthStatus {
            mode: self.strategy.mode(),
            fallback_enabled: self.config.fallback_to_simulation,
            last_known_responders: stored.checked_sub(1),
            metrics: self.metrics.snapshot(),
        }
    }
}
