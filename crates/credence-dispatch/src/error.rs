//! Dispatch error types

use thiserror::Error;

/// Errors that can occur while collecting responder opinions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// Network or HTTP-level failure talking to the responder network
    #[error("Transport error: {0}")]
    Transport(String),

    /// The submit-and-poll cycle exceeded its deadline
    #[error("Dispatch timed out after {0} ms")]
    Timeout(u64),

    /// The network reported the task as failed
    #[error("Task failed: {0}")]
    TaskFailed(String),

    /// The network replied with a body that could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DispatchError {
    /// Whether this error may be recovered by falling back to simulation
    pub fn is_transport(&self) -> bool {
        matches!(self, DispatchError::Transport(_))
    }
}

impl From<reqwest::Error> for DispatchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            DispatchError::InvalidResponse(e.to_string())
        } else {
            DispatchError::Transport(format!("Request failed: {}", e))
        }
    }
}
