use crate::core::sessions::{SendStatus, SessionsSendResult};
use serde::Serialize;
use std::io::{self, Write};

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("TOML serialization error: {0}")]
    TomlError(#[from] toml::ser::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl From<OutputError> for crate::domain::error::SessCtlError {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// Console output writer: results on stdout, failures on stderr
#[derive(Debug, Default)]
pub struct ConsoleWriter;

impl ConsoleWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_message(&self, message: &str) -> Result<(), OutputError> {
        writeln!(io::stdout().lock(), "{}", message)?;
        Ok(())
    }

    pub fn write_error(&self, error: &str) -> Result<(), OutputError> {
        writeln!(io::stderr().lock(), "Error: {}", error)?;
        Ok(())
    }

    pub fn write_json<T: Serialize>(&self, value: &T) -> Result<(), OutputError> {
        writeln!(io::stdout().lock(), "{}", serde_json::to_string_pretty(value)?)?;
        Ok(())
    }

    pub fn write_toml<T: Serialize>(&self, value: &T) -> Result<(), OutputError> {
        write!(io::stdout().lock(), "{}", toml::to_string_pretty(value)?)?;
        Ok(())
    }

    /// Render a send result, returning the process exit code
    pub fn write_send_result(&self, result: &SessionsSendResult, json: bool) -> Result<i32, OutputError> {
        render_send_result(result, json, &mut io::stdout().lock(), &mut io::stderr().lock())
    }
}

/// Render `result` to the given streams and return the exit code.
///
/// Failures exit 1 in both modes. JSON mode always prints the full result
/// on `out`; text mode prints failures on `err` only.
pub fn render_send_result<O: Write, E: Write>(
    result: &SessionsSendResult,
    json: bool,
    out: &mut O,
    err: &mut E,
) -> Result<i32, OutputError> {
    let exit_code = if result.is_success() { 0 } else { 1 };

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(result)?)?;
        return Ok(exit_code);
    }

    match (result.status, result.reply.as_deref()) {
        (SendStatus::Timeout | SendStatus::Error, _) => {
            let error = result.error.as_deref().unwrap_or("sessions send failed");
            writeln!(err, "Error: {}", error)?;
        }
        (SendStatus::Ok, Some(reply)) => writeln!(out, "{}", reply)?,
        (SendStatus::Accepted, _) => {
            writeln!(out, "Message queued for {}.", result.session_key)?
        }
        (SendStatus::Ok, None) => writeln!(out, "Message sent.")?,
    }

    Ok(exit_code)
}
