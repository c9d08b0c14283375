//! Test configuration builder for creating test configs programmatically

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use monitor::{Config, NotifierConfig};

use super::mock_telegram::{TEST_BOT_TOKEN, TEST_CHAT_ID};

/// Builder for monitor configurations pointing at mock servers
#[derive(Clone)]
pub struct TestConfigBuilder {
    rpc_endpoint: String,
    local_rpc_url: String,
    telegram_api_url: String,
    node_name: Option<String>,
    poll_interval_seconds: u64,
    alert_cooldown_seconds: u64,
    rpc_timeout_seconds: u64,
    status_height_floor: u64,
    stall_threshold_seconds: u64,
    min_peers: usize,
}

impl TestConfigBuilder {
    /// Point status, net_info and health at the same mock node
    pub fn new(rpc_url: &str, telegram_api_url: &str) -> Self {
        Self {
            rpc_endpoint: rpc_url.to_string(),
            local_rpc_url: rpc_url.to_string(),
            telegram_api_url: telegram_api_url.to_string(),
            node_name: None,
            poll_interval_seconds: 60,
            alert_cooldown_seconds: 3600,
            rpc_timeout_seconds: 2,
            status_height_floor: 100_000,
            stall_threshold_seconds: 0,
            min_peers: 1,
        }
    }

    pub fn rpc_endpoint(mut self, url: &str) -> Self {
        self.rpc_endpoint = url.to_string();
        self
    }

    pub fn local_rpc_url(mut self, url: &str) -> Self {
        self.local_rpc_url = url.to_string();
        self
    }

    pub fn node_name(mut self, name: &str) -> Self {
        self.node_name = Some(name.to_string());
        self
    }

    pub fn height_floor(mut self, floor: u64) -> Self {
        self.status_height_floor = floor;
        self
    }

    pub fn cooldown(mut self, seconds: u64) -> Self {
        self.alert_cooldown_seconds = seconds;
        self
    }

    pub fn stall_threshold(mut self, seconds: u64) -> Self {
        self.stall_threshold_seconds = seconds;
        self
    }

    pub fn min_peers(mut self, min_peers: usize) -> Self {
        self.min_peers = min_peers;
        self
    }

    pub fn build(self) -> Config {
        Config {
            rpc_endpoint: self.rpc_endpoint,
            status_path: "/status".to_string(),
            local_rpc_url: self.local_rpc_url,
            node_name: self.node_name,
            poll_interval_seconds: self.poll_interval_seconds,
            alert_cooldown_seconds: self.alert_cooldown_seconds,
            rpc_timeout_seconds: self.rpc_timeout_seconds,
            status_height_floor: self.status_height_floor,
            stall_threshold_seconds: self.stall_threshold_seconds,
            min_peers: self.min_peers,
            notifier: NotifierConfig::Telegram {
                token: TEST_BOT_TOKEN.to_string(),
                destination: TEST_CHAT_ID.to_string(),
                api_url: self.telegram_api_url,
            },
        }
    }
}

/// A config file written to a temporary directory
pub struct TestConfigFile {
    _temp_dir: TempDir,
    pub path: PathBuf,
}

impl TestConfigFile {
    /// Write `content` to `file_name` inside a fresh temp dir
    pub fn write(file_name: &str, content: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join(file_name);
        fs::write(&path, content).expect("Failed to write config file");
        Self {
            _temp_dir: temp_dir,
            path,
        }
    }
}
