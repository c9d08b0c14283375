//! Health check result model and CometBFT RPC response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification produced by every health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Healthy,
    Degraded,
    Unreachable,
}

impl CheckStatus {
    pub fn is_healthy(self) -> bool {
        self == CheckStatus::Healthy
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CheckStatus::Healthy => "healthy",
            CheckStatus::Degraded => "degraded",
            CheckStatus::Unreachable => "unreachable",
        };
        f.write_str(label)
    }
}

/// One observation of one health signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub check_name: String,
    pub status: CheckStatus,
    pub detail: String,
    pub observed_at: DateTime<Utc>,
}

impl CheckResult {
    pub fn new(check_name: &str, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            check_name: check_name.to_string(),
            status,
            detail: detail.into(),
            observed_at: Utc::now(),
        }
    }

    pub fn healthy(check_name: &str, detail: impl Into<String>) -> Self {
        Self::new(check_name, CheckStatus::Healthy, detail)
    }

    pub fn degraded(check_name: &str, detail: impl Into<String>) -> Self {
        Self::new(check_name, CheckStatus::Degraded, detail)
    }

    pub fn unreachable(check_name: &str, detail: impl Into<String>) -> Self {
        Self::new(check_name, CheckStatus::Unreachable, detail)
    }

    /// Override the observation timestamp
    pub fn at(mut self, observed_at: DateTime<Utc>) -> Self {
        self.observed_at = observed_at;
        self
    }
}

/// JSON-RPC envelope returned by CometBFT's URI endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct RpcEnvelope<T> {
    pub result: Option<T>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusResult {
    pub sync_info: SyncInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncInfo {
    pub latest_block_height: BlockHeight,
    #[serde(default)]
    pub catching_up: bool,
}

/// CometBFT encodes heights as strings; older tooling emits plain integers
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BlockHeight {
    Number(u64),
    Text(String),
}

impl BlockHeight {
    pub fn value(&self) -> Result<u64, String> {
        match self {
            BlockHeight::Number(height) => Ok(*height),
            BlockHeight::Text(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| format!("invalid block height '{}': {}", raw, e)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetInfoResult {
    #[serde(default)]
    pub peers: Vec<Peer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Peer {
    pub node_info: NodeInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeInfo {
    #[serde(default)]
    pub moniker: String,
}
