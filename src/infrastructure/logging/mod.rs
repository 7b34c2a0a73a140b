// Logging module - Logging infrastructure
use crate::domain::error::{SessCtlError, SessCtlResult};
use std::io::{self, IsTerminal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging system.
///
/// Logs always go to stderr; stdout is reserved for command output.
/// Colours are only emitted when stderr is a terminal.
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(log_level: &str, verbose: bool) -> SessCtlResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(log_level, verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal())
                .with_target(false)
                .with_level(true),
        )
        .try_init()
        .map_err(|e| SessCtlError::Config {
            message: format!("Failed to initialize logging: {}", e),
        })?;

    tracing::debug!("sessctl logging initialized");
    Ok(())
}

fn default_directive(log_level: &str, verbose: bool) -> String {
    let level = if verbose {
        "debug"
    } else {
        match log_level.to_ascii_lowercase().as_str() {
            "error" => "error",
            "warn" => "warn",
            "info" => "info",
            "debug" => "debug",
            "trace" => "trace",
            _ => "warn",
        }
    };
    format!("sessctl={}", level)
}
