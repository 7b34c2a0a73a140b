use serde::{Deserialize, Serialize};

/// sessctl configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessCtlConfig {
    /// Global configuration
    #[serde(default)]
    pub global: GlobalConfig,
    /// Gateway connection settings
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Session addressing settings
    #[serde(default)]
    pub session: SessionConfig,
}

/// Global configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Gateway connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// WebSocket URL of the gateway
    #[serde(default = "default_gateway_url")]
    pub url: String,
    /// Shared auth token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Password auth, used when no token is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Session addressing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Fully qualified key of the main session
    #[serde(default = "default_main_key")]
    pub main_key: String,
    /// Short alias users type for the main session
    #[serde(default = "default_alias")]
    pub alias: String,
}

// Default value functions
fn default_log_level() -> String {
    "warn".to_string()
}

fn default_gateway_url() -> String {
    "ws://127.0.0.1:18789".to_string()
}

fn default_main_key() -> String {
    "agent:main:main".to_string()
}

fn default_alias() -> String {
    "main".to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_gateway_url(),
            token: None,
            password: None,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            main_key: default_main_key(),
            alias: default_alias(),
        }
    }
}

impl SessCtlConfig {
    /// Copy of the configuration with secrets masked, for display
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.gateway.token.is_some() {
            config.gateway.token = Some("********".to_string());
        }
        if config.gateway.password.is_some() {
            config.gateway.password = Some("********".to_string());
        }
        config
    }
}
