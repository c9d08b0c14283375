pub mod manager;

use chrono::Duration as ChronoDuration;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::constants::defaults;
use crate::errors::ConfigError;

pub use manager::ConfigManager;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the node RPC used for the status query
    pub rpc_endpoint: String,
    #[serde(default = "default_status_path")]
    pub status_path: String,
    /// Local RPC listener queried for net_info and health
    #[serde(default = "default_local_rpc_url")]
    pub local_rpc_url: String,
    /// Optional label prefixed to every notification
    #[serde(default)]
    pub node_name: Option<String>,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    #[serde(default = "default_alert_cooldown")]
    pub alert_cooldown_seconds: u64,
    #[serde(default = "default_rpc_timeout")]
    pub rpc_timeout_seconds: u64,
    #[serde(default = "default_height_floor")]
    pub status_height_floor: u64,
    /// Zero disables stall detection
    #[serde(default = "default_stall_threshold")]
    pub stall_threshold_seconds: u64,
    #[serde(default = "default_min_peers")]
    pub min_peers: usize,
    pub notifier: NotifierConfig,
}

#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NotifierConfig {
    Telegram {
        token: String,
        destination: String,
        #[serde(default = "default_telegram_api_url")]
        api_url: String,
    },
    Webhook {
        url: String,
    },
}

// Keep the bot token out of logs and panic messages
impl fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifierConfig::Telegram {
                destination,
                api_url,
                ..
            } => f
                .debug_struct("Telegram")
                .field("token", &"<redacted>")
                .field("destination", destination)
                .field("api_url", api_url)
                .finish(),
            NotifierConfig::Webhook { url } => {
                f.debug_struct("Webhook").field("url", url).finish()
            }
        }
    }
}

fn default_status_path() -> String {
    defaults::STATUS_PATH.to_string()
}

fn default_local_rpc_url() -> String {
    defaults::LOCAL_RPC_URL.to_string()
}

fn default_poll_interval() -> u64 {
    defaults::POLL_INTERVAL_SECONDS
}

fn default_alert_cooldown() -> u64 {
    defaults::ALERT_COOLDOWN_SECONDS
}

fn default_rpc_timeout() -> u64 {
    defaults::RPC_TIMEOUT_SECONDS
}

fn default_height_floor() -> u64 {
    defaults::STATUS_HEIGHT_FLOOR
}

fn default_stall_threshold() -> u64 {
    defaults::STALL_THRESHOLD_SECONDS
}

fn default_min_peers() -> usize {
    defaults::MIN_PEERS
}

fn default_telegram_api_url() -> String {
    defaults::TELEGRAM_API_URL.to_string()
}

impl Config {
    /// Check the invariants the scheduler and alert policy rely on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc_endpoint.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "rpc_endpoint".to_string(),
            });
        }
        validate_url("rpc_endpoint", &self.rpc_endpoint)?;
        validate_url("local_rpc_url", &self.local_rpc_url)?;

        if self.poll_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_seconds".to_string(),
                reason: "must be a positive number of seconds".to_string(),
            });
        }

        if self.alert_cooldown_seconds <= self.poll_interval_seconds {
            return Err(ConfigError::InvalidValue {
                field: "alert_cooldown_seconds".to_string(),
                reason: format!(
                    "must be greater than poll_interval_seconds ({})",
                    self.poll_interval_seconds
                ),
            });
        }

        seconds_duration("alert_cooldown_seconds", self.alert_cooldown_seconds)?;
        seconds_duration("stall_threshold_seconds", self.stall_threshold_seconds)?;

        if self.rpc_timeout_seconds == 0 || self.rpc_timeout_seconds >= self.poll_interval_seconds
        {
            return Err(ConfigError::InvalidValue {
                field: "rpc_timeout_seconds".to_string(),
                reason: format!(
                    "must be positive and shorter than poll_interval_seconds ({})",
                    self.poll_interval_seconds
                ),
            });
        }

        match &self.notifier {
            NotifierConfig::Telegram {
                token,
                destination,
                api_url,
            } => {
                if token.trim().is_empty() {
                    return Err(ConfigError::MissingRequired {
                        field: "notifier.token".to_string(),
                    });
                }
                if destination.trim().is_empty() {
                    return Err(ConfigError::MissingRequired {
                        field: "notifier.destination".to_string(),
                    });
                }
                validate_url("notifier.api_url", api_url)?;
            }
            NotifierConfig::Webhook { url } => {
                if url.trim().is_empty() {
                    return Err(ConfigError::MissingRequired {
                        field: "notifier.url".to_string(),
                    });
                }
                validate_url("notifier.url", url)?;
            }
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_seconds)
    }

    /// Saturates at `ChronoDuration::MAX`; `validate()` rejects values that large
    pub fn alert_cooldown(&self) -> ChronoDuration {
        seconds_duration("alert_cooldown_seconds", self.alert_cooldown_seconds)
            .unwrap_or(ChronoDuration::MAX)
    }

    pub fn stall_threshold(&self) -> Option<ChronoDuration> {
        (self.stall_threshold_seconds > 0).then(|| {
            seconds_duration("stall_threshold_seconds", self.stall_threshold_seconds)
                .unwrap_or(ChronoDuration::MAX)
        })
    }

    pub fn status_url(&self) -> String {
        join_url(&self.rpc_endpoint, &self.status_path)
    }

    pub fn net_info_url(&self) -> String {
        join_url(&self.local_rpc_url, "/net_info")
    }

    pub fn health_url(&self) -> String {
        join_url(&self.local_rpc_url, "/health")
    }
}

fn seconds_duration(field: &str, seconds: u64) -> Result<ChronoDuration, ConfigError> {
    i64::try_from(seconds)
        .ok()
        .and_then(ChronoDuration::try_seconds)
        .ok_or_else(|| ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("{} seconds is out of range", seconds),
        })
}

fn validate_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        field: field.to_string(),
        reason: format!("'{}' is not a valid URL: {}", value, e),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// Join a base URL and a path without doubling or dropping the slash
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    format!("{}/{}", base, path.trim_start_matches('/'))
}
