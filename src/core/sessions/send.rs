use super::context::build_agent_to_agent_context;
use super::request::SendRequest;
use super::resolve::{ResolvedSession, SessionResolver};
use super::result::SessionsSendResult;
use super::transcript::latest_reply;
use crate::domain::config::SessionConfig;
use crate::domain::error::SessCtlResult;
use crate::infrastructure::gateway::GatewayCall;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

/// Transport bound for the initial `agent` call and the history fetch
pub const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Extra transport time granted on top of the requested `agent.wait`
pub const WAIT_GRACE_MS: u64 = 2_000;

/// Messages fetched from `chat.history` when looking for the reply
pub const HISTORY_LIMIT: usize = 50;

/// Channel tag for messages injected by operators rather than a surface
pub const INTERNAL_CHANNEL: &str = "webchat";

/// Lane tag for agent runs triggered from outside the session
pub const NESTED_LANE: &str = "nested";

/// Sends a message into an existing session and collects the outcome
pub struct SessionSendOrchestrator<G: GatewayCall> {
    gateway: G,
    session: SessionConfig,
}

impl<G: GatewayCall> SessionSendOrchestrator<G> {
    pub fn new(gateway: G, session: SessionConfig) -> Self {
        Self { gateway, session }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Validate raw input, resolve the session and run the send.
    ///
    /// Validation and resolution failures are returned as errors before
    /// any send is attempted. Gateway failures after that point are folded
    /// into the returned result.
    pub async fn send(
        &self,
        session: Option<&str>,
        message: Option<&str>,
        timeout: Option<&str>,
    ) -> SessCtlResult<SessionsSendResult> {
        let request = SendRequest::from_raw(session, message, timeout)?;
        let resolved = SessionResolver::new(&self.gateway, &self.session.alias, &self.session.main_key)
            .restrict_to_spawned(false)
            .resolve(&request.session_key)
            .await?;

        Ok(self.dispatch(&request, &resolved).await)
    }

    /// Run the send protocol for an already validated request
    pub async fn dispatch(
        &self,
        request: &SendRequest,
        resolved: &ResolvedSession,
    ) -> SessionsSendResult {
        let idempotency_key = Uuid::new_v4().to_string();
        let display_key = resolved.display_key.as_str();
        let params = json!({
            "message": request.message,
            "sessionKey": resolved.internal_key,
            "idempotencyKey": idempotency_key,
            "deliver": false,
            "channel": INTERNAL_CHANNEL,
            "lane": NESTED_LANE,
            "extraSystemPrompt": build_agent_to_agent_context(None, display_key),
        });

        debug!("Sending to {} (run {})", resolved.internal_key, idempotency_key);
        let response = match self.gateway.call("agent", params, SEND_TIMEOUT).await {
            Ok(response) => response,
            Err(e) => {
                debug!("agent call failed: {}", e);
                return SessionsSendResult::error(idempotency_key, display_key, e.to_string());
            }
        };
        let run_id = returned_run_id(&response).unwrap_or(idempotency_key);

        if !request.waits_for_reply() {
            info!("Message queued for {} (run {})", display_key, run_id);
            return SessionsSendResult::accepted(run_id, display_key);
        }

        let timeout_ms = request.timeout_seconds.saturating_mul(1000);
        let wait_timeout = Duration::from_millis(timeout_ms.saturating_add(WAIT_GRACE_MS));
        let wait = self
            .gateway
            .call(
                "agent.wait",
                json!({ "runId": run_id, "timeoutMs": timeout_ms }),
                wait_timeout,
            )
            .await;

        let wait = match wait {
            Ok(wait) => wait,
            Err(e) if e.is_timeout() => {
                debug!("Waiting for run {} timed out: {}", run_id, e);
                return SessionsSendResult::timeout(run_id, display_key, Some(e.to_string()));
            }
            Err(e) => {
                debug!("agent.wait failed for run {}: {}", run_id, e);
                return SessionsSendResult::error(run_id, display_key, e.to_string());
            }
        };

        let wait_error = wait.get("error").and_then(Value::as_str).map(str::to_string);
        match wait.get("status").and_then(Value::as_str) {
            Some("timeout") => {
                return SessionsSendResult::timeout(run_id, display_key, wait_error);
            }
            Some("error") => {
                let error = wait_error.unwrap_or_else(|| "agent error".to_string());
                return SessionsSendResult::error(run_id, display_key, error);
            }
            _ => {}
        }

        let history = self
            .gateway
            .call(
                "chat.history",
                json!({ "sessionKey": resolved.internal_key, "limit": HISTORY_LIMIT }),
                SEND_TIMEOUT,
            )
            .await;

        match history {
            Ok(history) => {
                let reply = latest_reply(&history);
                info!("Run {} finished (reply: {})", run_id, reply.is_some());
                SessionsSendResult::ok(run_id, display_key, reply)
            }
            Err(e) => {
                debug!("chat.history failed for {}: {}", resolved.internal_key, e);
                SessionsSendResult::error(run_id, display_key, e.to_string())
            }
        }
    }
}

fn returned_run_id(response: &Value) -> Option<String> {
    response
        .get("runId")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
