use crate::cli::args::{Args, Command, ConfigCommand, SendArgs, SessionsArgs, SessionsCommand};
use crate::cli::output::ConsoleWriter;
use crate::core::sessions::{SendRequest, SessionSendOrchestrator};
use crate::domain::config::SessCtlConfig;
use crate::domain::error::{SessCtlError, SessCtlResult};
use crate::infrastructure::config::{apply_env_overrides, ConfigManager};
use crate::infrastructure::gateway::WsGateway;
use crate::infrastructure::logging::init_logging;

/// Execute CLI command, returning the process exit code
pub async fn execute_command(args: Args) -> SessCtlResult<i32> {
    let writer = ConsoleWriter::new();

    // Input errors win over a broken config file
    if let Command::Sessions(SessionsArgs {
        command: SessionsCommand::Send(send_args),
    }) = &args.command
    {
        SendRequest::from_raw(
            send_args.session.as_deref(),
            send_args.message.as_deref(),
            send_args.timeout.as_deref(),
        )?;
    }

    // Load configuration using ConfigManager
    let config_manager = ConfigManager::new()?;
    let mut config = if let Some(config_path) = &args.config {
        config_manager.load_config_from_path(config_path.as_ref())?
    } else {
        config_manager.load_config()?
    };
    apply_env_overrides(&mut config);

    if !args.quiet {
        init_logging(&config.global.log_level, args.verbose)?;
    }

    match args.command {
        Command::Sessions(sessions_args) => match sessions_args.command {
            SessionsCommand::Send(send_args) => execute_send(send_args, &writer, &config).await,
        },
        Command::Config(config_args) => {
            execute_config_command(config_args.command, &writer, &config, &config_manager)
        }
        Command::Version => {
            writer.write_message(&format!("sessctl {}", env!("CARGO_PKG_VERSION")))?;
            Ok(0)
        }
    }
}

async fn execute_send(
    args: SendArgs,
    writer: &ConsoleWriter,
    config: &SessCtlConfig,
) -> SessCtlResult<i32> {
    let gateway = WsGateway::from_config(&config.gateway);
    let orchestrator = SessionSendOrchestrator::new(gateway, config.session.clone());

    let result = orchestrator
        .send(
            args.session.as_deref(),
            args.message.as_deref(),
            args.timeout.as_deref(),
        )
        .await?;

    Ok(writer.write_send_result(&result, args.json)?)
}

fn execute_config_command(
    command: ConfigCommand,
    writer: &ConsoleWriter,
    config: &SessCtlConfig,
    config_manager: &ConfigManager,
) -> SessCtlResult<i32> {
    match command {
        ConfigCommand::Show { json } => {
            let redacted = config.redacted();
            if json {
                writer.write_json(&redacted)?;
            } else {
                writer.write_toml(&redacted)?;
            }
            Ok(0)
        }
        ConfigCommand::Validate { file } => {
            let (label, loaded) = match &file {
                Some(path) => (
                    format!("Configuration file '{}'", path),
                    config_manager.load_config_from_path(path.as_ref()),
                ),
                None => ("Current configuration".to_string(), config_manager.load_config()),
            };
            match loaded {
                Ok(_) => {
                    writer.write_message(&format!("{} is valid", label))?;
                    Ok(0)
                }
                Err(e) => {
                    writer.write_error(&format!("Configuration validation failed: {}", e))?;
                    Ok(1)
                }
            }
        }
        ConfigCommand::Init { global } => {
            if global {
                let global_path = config_manager.get_global_config_path_ref();
                config_manager.save_config_to_path(global_path, &SessCtlConfig::default())?;
                writer.write_message(&format!(
                    "Global configuration initialized at '{}'",
                    global_path.display()
                ))?;
            } else {
                let current_dir = std::env::current_dir().map_err(|e| SessCtlError::Config {
                    message: format!("Failed to get current directory: {}", e),
                })?;
                let path = config_manager.init_project_config(&current_dir)?;
                writer.write_message(&format!(
                    "Project configuration initialized at '{}'",
                    path.display()
                ))?;
            }
            Ok(0)
        }
    }
}
