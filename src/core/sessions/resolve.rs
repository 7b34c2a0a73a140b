use crate::infrastructure::gateway::GatewayCall;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Session reference resolution failures
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Session reference is empty")]
    Empty,

    #[error("Unable to resolve session \"{reference}\": {reason}")]
    NotFound { reference: String, reason: String },

    #[error("Session \"{key}\" is not a spawned sub-agent session")]
    NotSpawned { key: String },
}

/// A session reference mapped to its outbound and display keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSession {
    /// Key used in gateway calls
    pub internal_key: String,
    /// Key shown to the operator
    pub display_key: String,
}

/// Resolves what the operator typed into a concrete session key
pub struct SessionResolver<'a, G: GatewayCall + ?Sized> {
    gateway: &'a G,
    alias: &'a str,
    main_key: &'a str,
    restrict_to_spawned: bool,
}

impl<'a, G: GatewayCall + ?Sized> SessionResolver<'a, G> {
    pub fn new(gateway: &'a G, alias: &'a str, main_key: &'a str) -> Self {
        Self {
            gateway,
            alias,
            main_key,
            restrict_to_spawned: false,
        }
    }

    /// Only accept sessions spawned as sub-agents
    pub fn restrict_to_spawned(mut self, restrict: bool) -> Self {
        self.restrict_to_spawned = restrict;
        self
    }

    pub async fn resolve(&self, reference: &str) -> Result<ResolvedSession, ResolveError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(ResolveError::Empty);
        }

        let internal_key = if reference == self.alias || reference == "main" {
            self.main_key.to_string()
        } else if is_session_key(reference) {
            reference.to_string()
        } else {
            self.lookup(reference).await?
        };

        if self.restrict_to_spawned && !is_subagent_key(&internal_key) {
            return Err(ResolveError::NotSpawned { key: internal_key });
        }

        let display_key = if internal_key == self.main_key {
            self.alias.to_string()
        } else {
            internal_key.clone()
        };

        debug!("Resolved session {} -> {}", reference, internal_key);
        Ok(ResolvedSession {
            internal_key,
            display_key,
        })
    }

    /// Ask the gateway to map a session id or label to its key
    async fn lookup(&self, reference: &str) -> Result<String, ResolveError> {
        let params = if Uuid::parse_str(reference).is_ok() {
            json!({ "sessionId": reference })
        } else {
            json!({ "label": reference })
        };

        let payload = self
            .gateway
            .call("sessions.resolve", params, LOOKUP_TIMEOUT)
            .await
            .map_err(|e| ResolveError::NotFound {
                reference: reference.to_string(),
                reason: e.to_string(),
            })?;

        payload
            .get("key")
            .and_then(|k| k.as_str())
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ResolveError::NotFound {
                reference: reference.to_string(),
                reason: "gateway returned no session key".to_string(),
            })
    }
}

/// Structured keys look like `agent:<agentId>:<rest>`
pub fn is_session_key(reference: &str) -> bool {
    reference.starts_with("agent:")
}

fn is_subagent_key(key: &str) -> bool {
    is_session_key(key) && key.split(':').nth(2) == Some("subagent")
}
