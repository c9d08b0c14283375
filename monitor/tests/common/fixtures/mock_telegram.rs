//! Mock Telegram Bot API for testing alert delivery
//!
//! Serves `getMe` and `sendMessage` for a fixed bot token and exposes the
//! messages that were received.

use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_BOT_TOKEN: &str = "123456:test-token";
pub const TEST_CHAT_ID: &str = "-1001234567890";

pub struct MockTelegramServer {
    pub server: MockServer,
    pub base_url: String,
}

impl MockTelegramServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    fn endpoint(method_name: &str) -> String {
        format!("/bot{}/{}", TEST_BOT_TOKEN, method_name)
    }

    /// Mock successful getMe
    pub async fn mock_get_me(&self) {
        Mock::given(method("GET"))
            .and(path(Self::endpoint("getMe")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {
                    "id": 123456,
                    "is_bot": true,
                    "username": "node_monitor_bot"
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock getMe rejecting the token
    pub async fn mock_get_me_unauthorized(&self) {
        Mock::given(method("GET"))
            .and(path(Self::endpoint("getMe")))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "ok": false,
                "error_code": 401,
                "description": "Unauthorized"
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock successful message delivery
    pub async fn mock_send_success(&self) {
        Mock::given(method("POST"))
            .and(path(Self::endpoint("sendMessage")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": { "message_id": 1 }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock Telegram refusing the message
    pub async fn mock_send_failure(&self, status_code: u16, description: &str) {
        Mock::given(method("POST"))
            .and(path(Self::endpoint("sendMessage")))
            .respond_with(ResponseTemplate::new(status_code).set_body_json(json!({
                "ok": false,
                "error_code": status_code,
                "description": description
            })))
            .mount(&self.server)
            .await;
    }

    /// Bodies of every sendMessage call received so far
    pub async fn sent_messages(&self) -> Vec<Value> {
        let send_path = Self::endpoint("sendMessage");
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == send_path)
            .filter_map(|request| request.body_json::<Value>().ok())
            .collect()
    }

    /// Text of every message received so far
    pub async fn sent_texts(&self) -> Vec<String> {
        self.sent_messages()
            .await
            .iter()
            .filter_map(|body| body.get("text").and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }
}
