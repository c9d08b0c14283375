//! Health monitoring module
//!
//! Each check probes one aspect of the node and always produces a
//! `CheckResult`; transport and decoding failures become `Unreachable`.

mod liveness;
mod peers;
mod status;
pub mod types;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::rpc::RpcClient;

pub use liveness::LivenessCheck;
pub use peers::PeersCheck;
pub use status::StatusCheck;
pub use types::{CheckResult, CheckStatus};

/// A single independent health probe
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Stable name keying this check's alert state
    fn name(&self) -> &str;

    /// Observe the node. Never fails: problems are reported in the result.
    async fn observe(&self) -> CheckResult;
}

/// Build the standard status, peers and liveness checks from config
pub fn build_checks(config: &Config, client: &RpcClient) -> Vec<Arc<dyn HealthCheck>> {
    vec![
        Arc::new(StatusCheck::new(
            client.clone(),
            config.status_url(),
            config.status_height_floor,
            config.stall_threshold(),
        )),
        Arc::new(PeersCheck::new(
            client.clone(),
            config.net_info_url(),
            config.min_peers,
        )),
        Arc::new(LivenessCheck::new(client.clone(), config.health_url())),
    ]
}
