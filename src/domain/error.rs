use crate::core::sessions::resolve::ResolveError;
use crate::infrastructure::gateway::GatewayError;
use thiserror::Error;

/// sessctl unified error type
#[derive(Error, Debug)]
pub enum SessCtlError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Output error: {0}")]
    Output(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SessCtlResult<T> = Result<T, SessCtlError>;
