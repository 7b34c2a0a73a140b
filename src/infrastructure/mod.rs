// Infrastructure module - External dependencies and adapters
pub mod config;
pub mod gateway;
pub mod logging;
