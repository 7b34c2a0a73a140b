//! sessctl Library
//!
//! Operator tooling for agent gateway sessions: sending a message into a
//! session over the gateway RPC and collecting the agent's reply.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use crate::core::sessions::{SendStatus, SessionSendOrchestrator, SessionsSendResult};
pub use crate::domain::config::SessCtlConfig;
pub use crate::domain::error::{SessCtlError, SessCtlResult};
pub use crate::infrastructure::gateway::{GatewayCall, GatewayError, WsGateway};
