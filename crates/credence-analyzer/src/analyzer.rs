//! Core Analyzer implementation

use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::types::{AnalysisMetadata, AnalysisReport, AnalyzeRequest, ResponderBreakdown};
use chrono::Utc;
use credence_aggregator::{AggregationConfig, RobustAggregator};
use credence_dispatch::{DispatchConfig, HealthStatus, MinerQueryDispatcher};
use credence_domain::{AnalysisId, ClaimKind, ClaimQuery, MinerResponse};
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

/// Runs claims through dispatch and aggregation
pub struct Analyzer {
    dispatcher: MinerQueryDispatcher,
    aggregator: RobustAggregator,
    config: AnalyzerConfig,
}

impl Analyzer {
    /// Build an Analyzer from the three configuration sections
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found.
    pub fn new(
        config: AnalyzerConfig,
        dispatch: DispatchConfig,
        aggregation: AggregationConfig,
    ) -> Result<Self, AnalyzerError> {
        let dispatcher = MinerQueryDispatcher::new(dispatch)?;
        let aggregator = RobustAggregator::new(aggregation)?;
        Self::from_parts(config, dispatcher, aggregator)
    }

    /// Build an Analyzer around an existing dispatcher and aggregator
    pub fn from_parts(
        config: AnalyzerConfig,
        dispatcher: MinerQueryDispatcher,
        aggregator: RobustAggregator,
    ) -> Result<Self, AnalyzerError> {
        config.validate().map_err(AnalyzerError::Config)?;
        Ok(Self {
            dispatcher,
            aggregator,
            config,
        })
    }

    /// Active analyzer configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Resolve a request against the configured defaults and bounds
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::InvalidRequest`] for an empty or oversized
    /// claim, a reference that is not an http(s) URL, or options outside the
    /// configured ranges.
    pub fn resolve(&self, request: &AnalyzeRequest) -> Result<ClaimQuery, AnalyzerError> {
        let claim = request.claim.trim();
        if claim.is_empty() {
            return Err(AnalyzerError::InvalidRequest("claim must not be empty".to_string()));
        }

        let length = claim.chars().count();
        if length > self.config.max_claim_chars {
            return Err(AnalyzerError::InvalidRequest(format!(
                "claim is {} characters (max: {})",
                length, self.config.max_claim_chars
            )));
        }

        if request.kind == ClaimKind::Reference {
            let valid = Url::parse(claim)
                .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
                .unwrap_or(false);
            if !valid {
                return Err(AnalyzerError::InvalidRequest(format!(
                    "reference claim must be an http(s) URL: {}",
                    claim
                )));
            }
        }

        let min_responders = request
            .options
            .min_responders
            .unwrap_or(self.config.default_min_responders);
        let (floor, ceiling) = (self.config.min_responders_floor, self.config.min_responders_ceiling);
        if !(floor..=ceiling).contains(&min_responders) {
            return Err(AnalyzerError::InvalidRequest(format!(
                "minResponders {} outside [{}, {}]",
                min_responders, floor, ceiling
            )));
        }

        let timeout_ms = request
            .options
            .timeout_ms
            .unwrap_or(self.config.default_timeout_ms);
        let (shortest, longest) = (self.config.min_timeout_ms, self.config.max_timeout_ms);
        if !(shortest..=longest).contains(&timeout_ms) {
            return Err(AnalyzerError::InvalidRequest(format!(
                "timeoutMs {} outside [{}, {}]",
                timeout_ms, shortest, longest
            )));
        }

        ClaimQuery::new(claim, request.kind, min_responders, timeout_ms)
            .map_err(AnalyzerError::InvalidRequest)
    }

    /// Analyze one claim end to end
    ///
    /// # Errors
    ///
    /// - [`AnalyzerError::InvalidRequest`] from [`Analyzer::resolve`]
    /// - [`AnalyzerError::Dispatch`] for timeouts, task failures and
    ///   transport errors that were not recovered by fallback
    /// - [`AnalyzerError::Aggregation`] when no responses arrived
    pub async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalysisReport, AnalyzerError> {
        let started = Instant::now();
        let query = self.resolve(&request)?;

        info!(
            "Starting analysis of {} claim ({} chars), {} responders, {} ms deadline",
            query.kind(),
            query.claim().chars().count(),
            query.min_responders(),
            query.timeout_ms()
        );

        let outcome = self.dispatcher.dispatch_detailed(&query).await?;

        let requested = query.min_responders() as usize;
        if outcome.responses.len() < requested {
            warn!(
                "Received {} responses, fewer than the {} requested",
                outcome.responses.len(),
                requested
            );
        }

        let breakdown: Vec<ResponderBreakdown> =
            outcome.responses.iter().map(ResponderBreakdown::from).collect();
        let recovered_count = outcome.recovered_count();
        let dispatch_mode = outcome.mode;
        let fell_back = outcome.fell_back;
        let responses: Vec<MinerResponse> = outcome.into_responses();

        let aggregated = self.aggregator.aggregate(&responses)?;

        let report = AnalysisReport {
            id: AnalysisId::new(),
            claim: query.claim().to_string(),
            kind: query.kind(),
            credibility_score: aggregated.credibility_score,
            confidence: aggregated.confidence,
            is_credible: aggregated.is_credible,
            consensus: aggregated.consensus,
            supporting_sources: aggregated.supporting_sources,
            per_responder_breakdown: breakdown,
            metadata: AnalysisMetadata {
                processed_at: Utc::now(),
                responder_count: responses.len(),
                recovered_count,
                processing_time_ms: started.elapsed().as_millis() as u64,
                aggregation_time_ms: aggregated.processing_time_ms,
                dispatch_mode,
                fell_back,
            },
        };

        info!(
            "Analysis {} complete: score {:.3}, confidence {:.3}, credible {}",
            report.id, report.credibility_score, report.confidence, report.is_credible
        );
        debug!("Consensus: {}", report.consensus);

        Ok(report)
    }

    /// Dispatcher health
    pub fn health(&self) -> HealthStatus {
        self.dispatcher.health()
    }

    /// Probe the responder network, then report health
    pub async fn probe(&self) -> Result<HealthStatus, AnalyzerError> {
        self.dispatcher.probe().await?;
        Ok(self.dispatcher.health())
    }
}
