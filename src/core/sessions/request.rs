use crate::domain::error::{SessCtlError, SessCtlResult};

/// Wait applied when `--timeout` is omitted
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// A validated send request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub session_key: String,
    pub message: String,
    /// Zero means fire-and-forget
    pub timeout_seconds: u64,
}

impl SendRequest {
    /// Build a request from raw command line values
    pub fn from_raw(
        session: Option<&str>,
        message: Option<&str>,
        timeout: Option<&str>,
    ) -> SessCtlResult<Self> {
        let session_key = required(session, "--session")?;
        let message = required(message, "--message")?;
        let timeout_seconds = parse_timeout(timeout)?;

        Ok(Self {
            session_key,
            message,
            timeout_seconds,
        })
    }

    pub fn waits_for_reply(&self) -> bool {
        self.timeout_seconds > 0
    }
}

fn required(value: Option<&str>, flag: &str) -> SessCtlResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(SessCtlError::InvalidInput(format!("{} is required", flag))),
    }
}

/// Parse `--timeout`; absent or blank falls back to the default
pub fn parse_timeout(raw: Option<&str>) -> SessCtlResult<u64> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_TIMEOUT_SECONDS),
        Some(v) => v,
    };

    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_timeout());
    }
    raw.parse::<u64>().map_err(|_| invalid_timeout())
}

fn invalid_timeout() -> SessCtlError {
    SessCtlError::InvalidInput("--timeout must be a non-negative integer (seconds)".to_string())
}
