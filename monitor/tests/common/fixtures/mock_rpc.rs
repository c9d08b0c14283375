//! Mock RPC server for testing node interactions
//!
//! Simulates the CometBFT status, net_info and health endpoints without a
//! real node.

use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Mock RPC server that simulates node responses
pub struct MockRpcServer {
    pub server: MockServer,
    pub base_url: String,
}

impl MockRpcServer {
    /// Create a new mock RPC server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    /// Drop every mounted response, e.g. to change node behaviour between ticks
    pub async fn reset(&self) {
        self.server.reset().await;
    }

    /// Mock status endpoint reporting the given height
    pub async fn mock_status(&self, latest_block: u64, catching_up: bool) {
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": -1,
                "result": {
                    "node_info": {
                        "network": "pirin-1",
                        "moniker": "test-node"
                    },
                    "sync_info": {
                        "latest_block_height": latest_block.to_string(),
                        "catching_up": catching_up
                    }
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock status endpoint with an arbitrary body
    pub async fn mock_status_body(&self, status_code: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Mock status endpoint returning a JSON-RPC error envelope
    pub async fn mock_status_rpc_error(&self, code: i64, message: &str) {
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": -1,
                "error": {
                    "code": code,
                    "message": message
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock net_info with one peer per moniker
    pub async fn mock_net_info(&self, monikers: &[&str]) {
        let peers: Vec<_> = monikers
            .iter()
            .enumerate()
            .map(|(i, moniker)| {
                json!({
                    "node_info": {
                        "id": format!("{:040x}", i),
                        "moniker": moniker,
                        "network": "pirin-1"
                    },
                    "is_outbound": true,
                    "remote_ip": format!("10.0.0.{}", i + 1)
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path("/net_info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": -1,
                "result": {
                    "listening": true,
                    "n_peers": monikers.len().to_string(),
                    "peers": peers
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock healthy health endpoint (`{}` with 200)
    pub async fn mock_health_ok(&self) {
        self.mock_health(200, "{}").await;
    }

    /// Mock health endpoint with any status and body
    pub async fn mock_health(&self, status_code: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Mock a fully healthy node
    pub async fn mock_healthy_node(&self, latest_block: u64, monikers: &[&str]) {
        self.mock_status(latest_block, false).await;
        self.mock_net_info(monikers).await;
        self.mock_health_ok().await;
    }
}
