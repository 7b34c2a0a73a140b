use clap::{Args as ClapArgs, Parser, Subcommand};

/// Command line arguments for sessctl
#[derive(Parser, Debug)]
#[command(
    name = "sessctl",
    version = env!("CARGO_PKG_VERSION"),
    about = "Operator CLI for agent gateway sessions",
    long_about = "Send messages into agent gateway sessions, optionally waiting for the agent's reply."
)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Session commands
    Sessions(SessionsArgs),
    /// Configuration management commands
    Config(ConfigArgs),
    /// Display version information
    Version,
}

/// Session command arguments
#[derive(ClapArgs, Debug)]
pub struct SessionsArgs {
    /// Sessions subcommand
    #[command(subcommand)]
    pub command: SessionsCommand,
}

/// Configuration management arguments
#[derive(ClapArgs, Debug)]
pub struct ConfigArgs {
    /// Configuration subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Session subcommands
#[derive(Subcommand, Debug)]
pub enum SessionsCommand {
    /// Send a message into a session
    Send(SendArgs),
}

/// Arguments of `sessions send`.
///
/// Values are kept as raw strings; trimming, defaults and range checks
/// happen when the request is built.
#[derive(ClapArgs, Debug, Default)]
pub struct SendArgs {
    /// Session key, alias, id or label
    #[arg(long)]
    pub session: Option<String>,

    /// Message text
    #[arg(long, allow_hyphen_values = true)]
    pub message: Option<String>,

    /// Seconds to wait for the reply (0 = do not wait, default 30)
    #[arg(long, allow_hyphen_values = true)]
    pub timeout: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Print as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
    /// Validate configuration
    Validate {
        /// Configuration file path
        file: Option<String>,
    },
    /// Create default configuration
    Init {
        /// Write the global configuration instead of a project one
        #[arg(short, long)]
        global: bool,
    },
}
