//! Peer connectivity check against net_info

use async_trait::async_trait;
use tracing::{debug, warn};

use super::types::{CheckResult, NetInfoResult};
use super::HealthCheck;
use crate::constants::checks;
use crate::rpc::RpcClient;

pub struct PeersCheck {
    client: RpcClient,
    url: String,
    min_peers: usize,
}

impl PeersCheck {
    pub fn new(client: RpcClient, url: String, min_peers: usize) -> Self {
        Self {
            client,
            url,
            min_peers,
        }
    }
}

#[async_trait]
impl HealthCheck for PeersCheck {
    fn name(&self) -> &str {
        checks::PEERS
    }

    async fn observe(&self) -> CheckResult {
        let net_info = match self.client.get_rpc_result::<NetInfoResult>(&self.url).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Peers check could not reach node: {}", e);
                return CheckResult::unreachable(checks::PEERS, e.to_string());
            }
        };

        let monikers: Vec<&str> = net_info
            .peers
            .iter()
            .map(|peer| peer.node_info.moniker.as_str())
            .collect();
        let count = monikers.len();
        debug!("Connected peers ({}): {:?}", count, monikers);

        if count == 0 {
            return CheckResult::degraded(checks::PEERS, "0 peers connected");
        }

        if count < self.min_peers {
            return CheckResult::degraded(
                checks::PEERS,
                format!(
                    "{} peers connected, below minimum {}: {}",
                    count,
                    self.min_peers,
                    monikers.join(", ")
                ),
            );
        }

        CheckResult::healthy(
            checks::PEERS,
            format!("{} peers connected: {}", count, monikers.join(", ")),
        )
    }
}
