// Gateway module - RPC access to the agent gateway
pub mod client;
pub mod protocol;

pub use client::{GatewayAuth, WsGateway};

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while talking to the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("gateway timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("gateway connect failed ({url}): {message}")]
    Connect { url: String, message: String },

    #[error("gateway closed the connection: {0}")]
    Closed(String),

    #[error("gateway protocol error: {0}")]
    Protocol(String),

    #[error("{message}")]
    Remote {
        code: Option<String>,
        message: String,
    },

    #[error("gateway serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GatewayError {
    /// Whether the call ran out of time.
    ///
    /// Structured timeouts are recognised first. Errors relayed from the
    /// gateway only carry text, so those fall back to a message match.
    pub fn is_timeout(&self) -> bool {
        match self {
            GatewayError::Timeout { .. } => true,
            other => other.to_string().to_lowercase().contains("gateway timeout"),
        }
    }
}

/// A single request/response call against the gateway
#[async_trait]
pub trait GatewayCall: Send + Sync {
    /// Invoke `method` with `params`, giving up after `timeout`
    async fn call(&self, method: &str, params: Value, timeout: Duration)
        -> Result<Value, GatewayError>;
}
