use serde_json::Value;
use thiserror::Error;

use crate::ExecutionResult;

/// Errors that can occur while talking to the network.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum NetworkError {
    #[error("invalid rpc url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("http status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String, data: Option<Value> },

    #[error("invalid response for {method}: {reason}")]
    InvalidResponse { method: String, reason: String },

    #[error("insufficient gas: {available} MIST available, budget is {budget} MIST")]
    InsufficientGas { available: u128, budget: u64 },

    #[error("failed to encode transaction: {0}")]
    Encode(String),

    #[error("dry run rejected: {0}")]
    Simulation(String),

    /// The transaction was submitted but not executed successfully. `result` holds the node's
    /// response when the transaction was executed and reported a failure.
    #[error("transaction {digest} was not executed successfully: {reason}")]
    Broadcast { digest: String, reason: String, result: Option<Box<ExecutionResult>> },
}

impl NetworkError {
    /// Returns true if the request may succeed when repeated.
    ///
    /// Only failures that happen before the node has processed the request qualify: timeouts,
    /// connection failures, rate limiting and server-side unavailability.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            NetworkError::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            NetworkError::Http { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }

    pub(crate) fn invalid_response(method: &str, reason: impl ToString) -> Self {
        NetworkError::InvalidResponse { method: method.to_string(), reason: reason.to_string() }
    }
}
