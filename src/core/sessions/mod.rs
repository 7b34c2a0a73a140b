// Sessions module - Sending messages into gateway sessions
pub mod context;
pub mod request;
pub mod resolve;
pub mod result;
pub mod send;
pub mod transcript;

#[cfg(test)]
pub(crate) mod testing;

pub use request::{parse_timeout, SendRequest, DEFAULT_TIMEOUT_SECONDS};
pub use resolve::{ResolveError, ResolvedSession, SessionResolver};
pub use result::{SendStatus, SessionsSendResult};
pub use send::SessionSendOrchestrator;
