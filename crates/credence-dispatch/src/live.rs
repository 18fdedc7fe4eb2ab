//! Live dispatch against the responder network
//!
//! Protocol, JSON over HTTP:
//!
//! - `POST {endpoint}/tasks` submits the claim and returns `{"task_id"}`
//! - `GET {endpoint}/tasks/{task_id}` reports `pending`, `processing`,
//!   `completed` (with `responses`) or `failed` (with `error`)
//! - `GET {endpoint}/network/status` reports `{"active_responders"}`
//!
//! The whole submit-and-poll cycle runs under the query's deadline; expiry
//! yields [`DispatchError::Timeout`] and never partial data.

use crate::config::{DispatchConfig, DispatchMode};
use crate::{DispatchError, DispatchStrategy};
use async_trait::async_trait;
use credence_domain::ClaimQuery;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Task submission body
#[derive(Debug, Serialize)]
struct TaskSubmission<'a> {
    claim: &'a str,
    kind: &'a str,
    model: &'a str,
    min_responders: u32,
    max_responders: u32,
    timeout_ms: u64,
    temperature: f64,
    max_tokens: u32,
    consensus_validation: bool,
    require_sources: bool,
}

/// Reply to a submission
#[derive(Debug, Deserialize)]
struct SubmissionReceipt {
    task_id: String,
}

/// Reply to a status poll
#[derive(Debug, Deserialize)]
struct TaskStatusReply {
    status: String,
    #[serde(default)]
    responses: Option<Vec<Value>>,
    #[serde(default)]
    error: Option<String>,
}

/// Reply from the network status endpoint
#[derive(Debug, Deserialize)]
struct NetworkStatus {
    active_responders: u64,
}

/// Limiter spacing outbound requests `min_interval` apart; `None` when zero
fn outbound_limiter(min_interval: Duration) -> Option<DefaultDirectRateLimiter> {
    Quota::with_period(min_interval).map(RateLimiter::direct)
}

/// Submit-and-poll strategy over HTTP
pub struct LiveDispatch {
    config: DispatchConfig,
    client: reqwest::Client,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl fmt::Debug for LiveDispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveDispatch")
            .field("config", &self.config)
            .field("rate_limited", &self.limiter.is_some())
            .finish_non_exhaustive()
    }
}

impl LiveDispatch {
    /// Create a live strategy from `config`
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Config`] if the HTTP client cannot be built.
    pub fn new(config: DispatchConfig) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| DispatchError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            limiter: outbound_limiter(config.min_request_interval()),
            client,
            config,
        })
    }

    /// Endpoint this strategy talks to
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    async fn submit(&self, query: &ClaimQuery) -> Result<String, DispatchError> {
        let body = TaskSubmission {
            claim: query.claim(),
            kind: query.kind().as_str(),
            model: &self.config.model,
            min_responders: query.min_responders(),
            max_responders: self.config.max_responders_for(query.min_responders()),
            timeout_ms: query.timeout_ms(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            consensus_validation: true,
            require_sources: true,
        };

        let receipt: SubmissionReceipt = self
            .send(self.client.post(self.url("tasks")).json(&body))
            .await?;

        info!(
            "Submitted task {} (min {} / max {} responders)",
            receipt.task_id, body.min_responders, body.max_responders
        );
        Ok(receipt.task_id)
    }

    async fn poll_until_done(&self, task_id: &str) -> Result<Vec<Value>, DispatchError> {
        let url = self.url(&format!("tasks/{}", task_id));
        let mut last_status = String::new();

        loop {
            tokio::time::sleep(self.config.poll_interval()).await;

            let reply: TaskStatusReply = self.send(self.client.get(&url)).await?;
            if reply.status != last_status {
                debug!("Task {} status: {}", task_id, reply.status);
                last_status = reply.status.clone();
            }

            match reply.status.as_str() {
                "completed" => {
                    return reply.responses.ok_or_else(|| {
                        DispatchError::InvalidResponse(format!(
                            "task {} completed without responses",
                            task_id
                        ))
                    });
                }
                "failed" => {
                    let reason = reply.error.unwrap_or_else(|| "unknown error".to_string());
                    warn!("Task {} failed: {}", task_id, reason);
                    return Err(DispatchError::TaskFailed(reason));
                }
                // pending, processing, and anything unrecognized keep polling
                _ => {}
            }
        }
    }

    /// Send a request and decode a 2xx JSON body
    ///
    /// Non-2xx statuses and connection failures are transport errors; a 2xx
    /// body that does not decode is an invalid response.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, DispatchError> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        let request = match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        };

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DispatchError::Transport(format!("HTTP {}: {}", status, error_text)));
        }

        let body = response.text().await?;

        serde_json::from_str(&body)
            .map_err(|e| DispatchError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl DispatchStrategy for LiveDispatch {
    async fn fetch(&self, query: &ClaimQuery) -> Result<Vec<Value>, DispatchError> {
        let cycle = async {
            let task_id = self.submit(query).await?;
            self.poll_until_done(&task_id).await
        };

        match tokio::time::timeout(query.timeout(), cycle).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Dispatch exceeded its {} ms deadline", query.timeout_ms());
                Err(DispatchError::Timeout(query.timeout_ms()))
            }
        }
    }

    async fn probe(&self) -> Result<Option<u64>, DispatchError> {
        let status: NetworkStatus = self.send(self.client.get(self.url("network/status"))).await?;
        debug!("Network reports {} active responders", status.active_responders);
        Ok(Some(status.active_responders))
    }

    fn mode(&self) -> DispatchMode {
        DispatchMode::Live
    }
}
