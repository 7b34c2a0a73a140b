// Core module - Session operations against the gateway
pub mod sessions;
