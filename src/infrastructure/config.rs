use crate::domain::{
    config::SessCtlConfig,
    error::{SessCtlError, SessCtlResult},
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variables that override file settings
pub const ENV_GATEWAY_URL: &str = "SESSCTL_GATEWAY_URL";
pub const ENV_GATEWAY_TOKEN: &str = "SESSCTL_GATEWAY_TOKEN";
pub const ENV_GATEWAY_PASSWORD: &str = "SESSCTL_GATEWAY_PASSWORD";

const PROJECT_DIR: &str = ".sessctl";
const CONFIG_FILE: &str = "config.toml";

/// Configuration manager
pub struct ConfigManager {
    global_config_path: PathBuf,
    project_config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create new configuration manager
    pub fn new() -> SessCtlResult<Self> {
        let global_config_path = Self::get_global_config_path()?;
        let project_config_path = Self::find_project_config_path();

        Ok(Self {
            global_config_path,
            project_config_path,
        })
    }

    /// Configuration manager over explicit file locations
    pub fn with_paths(global_config_path: PathBuf, project_config_path: Option<PathBuf>) -> Self {
        Self {
            global_config_path,
            project_config_path,
        }
    }

    /// Load configuration from files, project settings winning over global ones
    pub fn load_config(&self) -> SessCtlResult<SessCtlConfig> {
        let mut config = SessCtlConfig::default();

        if self.global_config_path.exists() {
            debug!("Loading global config {}", self.global_config_path.display());
            config = self.load_config_from_path(&self.global_config_path)?;
        }

        if let Some(project_path) = &self.project_config_path {
            if project_path.exists() {
                debug!("Loading project config {}", project_path.display());
                let content = read_file(project_path)?;
                let project = parse(project_path, &content)?;
                config = merge(config, project, &content);
            }
        }

        Ok(config)
    }

    /// Get global configuration path
    fn get_global_config_path() -> SessCtlResult<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| SessCtlError::Config {
            message: "Could not determine home directory".to_string(),
        })?;

        Ok(home.join(".config").join("sessctl").join(CONFIG_FILE))
    }

    /// Find project configuration path by walking up directory tree
    fn find_project_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        let mut path = current_dir.as_path();

        loop {
            let config_path = path.join(PROJECT_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            path = path.parent()?;
        }
    }

    /// Load configuration from specific path
    pub fn load_config_from_path(&self, path: &Path) -> SessCtlResult<SessCtlConfig> {
        parse(path, &read_file(path)?)
    }

    /// Save configuration to specific path
    pub fn save_config_to_path(&self, path: &Path, config: &SessCtlConfig) -> SessCtlResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SessCtlError::Config {
                message: format!("Failed to create config directory: {}", e),
            })?;
        }

        let content = toml::to_string_pretty(config).map_err(|e| SessCtlError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, content).map_err(|e| SessCtlError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })
    }

    /// Create default project configuration under `path`
    pub fn init_project_config(&self, path: &Path) -> SessCtlResult<PathBuf> {
        let config_file = path.join(PROJECT_DIR).join(CONFIG_FILE);

        if config_file.exists() {
            return Err(SessCtlError::Config {
                message: "Project configuration already exists".to_string(),
            });
        }

        self.save_config_to_path(&config_file, &SessCtlConfig::default())?;
        Ok(config_file)
    }

    /// Get the global config path
    pub fn get_global_config_path_ref(&self) -> &PathBuf {
        &self.global_config_path
    }
}

fn read_file(path: &Path) -> SessCtlResult<String> {
    fs::read_to_string(path).map_err(|e| SessCtlError::Config {
        message: format!("Failed to read config file {}: {}", path.display(), e),
    })
}

fn parse(path: &Path, content: &str) -> SessCtlResult<SessCtlConfig> {
    toml::from_str(content).map_err(|e| SessCtlError::Config {
        message: format!("Failed to parse config file {}: {}", path.display(), e),
    })
}

/// Overlay the sections a project file actually declares
fn merge(base: SessCtlConfig, project: SessCtlConfig, raw: &str) -> SessCtlConfig {
    let declared: toml::Table = toml::from_str(raw).unwrap_or_default();
    SessCtlConfig {
        global: if declared.contains_key("global") { project.global } else { base.global },
        gateway: if declared.contains_key("gateway") { project.gateway } else { base.gateway },
        session: if declared.contains_key("session") { project.session } else { base.session },
    }
}

/// Apply environment overrides on top of file configuration
pub fn apply_env_overrides(config: &mut SessCtlConfig) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

fn apply_overrides(config: &mut SessCtlConfig, lookup: impl Fn(&str) -> Option<String>) {
    let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(url) = value(ENV_GATEWAY_URL) {
        config.gateway.url = url;
    }
    if let Some(token) = value(ENV_GATEWAY_TOKEN) {
        config.gateway.token = Some(token);
    }
    if let Some(password) = value(ENV_GATEWAY_PASSWORD) {
        config.gateway.password = Some(password);
    }
}
