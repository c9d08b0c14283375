use super::Config;
use crate::errors::ConfigError;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    pub async fn new(config_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::load_configuration(config_path.as_ref()).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(config_path: &Path) -> Result<Config, ConfigError> {
        debug!("Loading config: {}", config_path.display());

        let content = fs::read_to_string(config_path)
            .await
            .map_err(|e| ConfigError::LoadFailed {
                path: config_path.display().to_string(),
                reason: e.to_string(),
            })?;

        let config = Self::parse(config_path, &content)?;
        config.validate()?;

        info!(
            "Loaded config: rpc {}, poll every {}s, cooldown {}s, height floor {}",
            config.rpc_endpoint,
            config.poll_interval_seconds,
            config.alert_cooldown_seconds,
            config.status_height_floor
        );

        Ok(config)
    }

    /// Parse TOML, or JSON when the file has a `.json` extension
    pub fn parse(config_path: &Path, content: &str) -> Result<Config, ConfigError> {
        let is_json = config_path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
                reason: format!("{}: {}", config_path.display(), e),
            })
        } else {
            toml::from_str(content).map_err(|e| ConfigError::ParseError {
                reason: format!("{}: {}", config_path.display(), e),
            })
        }
    }
}
