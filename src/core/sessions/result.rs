use serde::{Deserialize, Serialize};

/// Outcome of a send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendStatus {
    /// Queued without waiting for the agent
    Accepted,
    /// The agent finished
    Ok,
    Timeout,
    Error,
}

impl SendStatus {
    pub fn is_success(self) -> bool {
        matches!(self, SendStatus::Accepted | SendStatus::Ok)
    }
}

impl std::fmt::Display for SendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendStatus::Accepted => write!(f, "accepted"),
            SendStatus::Ok => write!(f, "ok"),
            SendStatus::Timeout => write!(f, "timeout"),
            SendStatus::Error => write!(f, "error"),
        }
    }
}

/// Result of `sessions send`, as rendered to the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionsSendResult {
    pub run_id: String,
    pub status: SendStatus,
    /// Display form of the session key
    pub session_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SessionsSendResult {
    pub fn accepted(run_id: impl Into<String>, session_key: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            status: SendStatus::Accepted,
            session_key: session_key.into(),
            reply: None,
            error: None,
        }
    }

    pub fn ok(
        run_id: impl Into<String>,
        session_key: impl Into<String>,
        reply: Option<String>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            status: SendStatus::Ok,
            session_key: session_key.into(),
            reply,
            error: None,
        }
    }

    pub fn timeout(
        run_id: impl Into<String>,
        session_key: impl Into<String>,
        error: Option<String>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            status: SendStatus::Timeout,
            session_key: session_key.into(),
            reply: None,
            error,
        }
    }

    pub fn error(
        run_id: impl Into<String>,
        session_key: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            status: SendStatus::Error,
            session_key: session_key.into(),
            reply: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
