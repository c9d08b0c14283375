//! Notification transports
//!
//! A transport delivers one notification to one destination and reports
//! failure as a `DispatchError`. It never retries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::alert_policy::DecisionKind;
use crate::config::{join_url, NotifierConfig};
use crate::constants::alerts::DISPATCH_TIMEOUT;
use crate::errors::DispatchError;
use crate::health::CheckStatus;
use crate::rpc::{error_chain, truncate_body};

/// What gets delivered for an Alert or Cleared decision
#[derive(Debug, Clone, Serialize)]
pub struct AlertNotification {
    pub timestamp: DateTime<Utc>,
    pub check_name: String,
    pub kind: DecisionKind,
    pub status: CheckStatus,
    pub message: String,
    pub node_name: Option<String>,
}

impl AlertNotification {
    /// Plain-text rendering for chat transports
    pub fn text(&self) -> String {
        match &self.node_name {
            Some(node) => format!("[{}] {}", node, self.message),
            None => self.message.clone(),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short transport name used in logs and errors
    fn transport(&self) -> &str;

    /// Confirm the transport can deliver to `destination` before the loop starts
    async fn verify(&self, destination: &str) -> Result<(), DispatchError>;

    async fn send(
        &self,
        destination: &str,
        notification: &AlertNotification,
    ) -> Result<(), DispatchError>;
}

/// Build the configured transport and the destination it delivers to
pub fn build_notifier(
    config: &NotifierConfig,
) -> Result<(Arc<dyn Notifier>, String), DispatchError> {
    match config {
        NotifierConfig::Telegram {
            token,
            destination,
            api_url,
        } => {
            let notifier = TelegramNotifier::new(api_url, token)?;
            Ok((Arc::new(notifier), destination.clone()))
        }
        NotifierConfig::Webhook { url } => {
            let notifier = WebhookNotifier::new()?;
            Ok((Arc::new(notifier), url.clone()))
        }
    }
}

fn http_client(transport: &str) -> Result<Client, DispatchError> {
    Client::builder()
        .timeout(DISPATCH_TIMEOUT)
        .build()
        .map_err(|e| DispatchError::ConnectionFailed {
            transport: transport.to_string(),
            reason: format!("failed to create HTTP client: {}", e),
        })
}

fn request_error(transport: &str, err: reqwest::Error) -> DispatchError {
    if err.is_timeout() {
        DispatchError::Timeout {
            transport: transport.to_string(),
        }
    } else {
        // The Telegram URL embeds the bot token
        DispatchError::ConnectionFailed {
            transport: transport.to_string(),
            reason: error_chain(&err.without_url()),
        }
    }
}

const TELEGRAM: &str = "telegram";
const WEBHOOK: &str = "webhook";

/// Telegram Bot API transport
pub struct TelegramNotifier {
    client: Client,
    bot_url: String,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<serde_json::Value>,
}

impl TelegramNotifier {
    pub fn new(api_url: &str, token: &str) -> Result<Self, DispatchError> {
        Ok(Self {
            client: http_client(TELEGRAM)?,
            bot_url: join_url(api_url, &format!("bot{}", token)),
        })
    }

    async fn read_response(
        &self,
        response: reqwest::Response,
    ) -> Result<TelegramResponse, DispatchError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| request_error(TELEGRAM, e))?;

        let parsed: Option<TelegramResponse> = serde_json::from_str(&body).ok();

        match parsed {
            Some(reply) if status.is_success() && reply.ok => Ok(reply),
            Some(reply) => Err(DispatchError::Rejected {
                transport: TELEGRAM.to_string(),
                status: status.as_u16(),
                reason: reply
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            }),
            None if status.is_success() => Err(DispatchError::InvalidResponse {
                transport: TELEGRAM.to_string(),
                reason: format!("unparseable body: {}", truncate_body(&body)),
            }),
            None => Err(DispatchError::Rejected {
                transport: TELEGRAM.to_string(),
                status: status.as_u16(),
                reason: truncate_body(&body),
            }),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn transport(&self) -> &str {
        TELEGRAM
    }

    async fn verify(&self, _destination: &str) -> Result<(), DispatchError> {
        let response = self
            .client
            .get(format!("{}/getMe", self.bot_url))
            .send()
            .await
            .map_err(|e| request_error(TELEGRAM, e))?;

        let reply = self.read_response(response).await?;
        let username = reply
            .result
            .as_ref()
            .and_then(|bot| bot.get("username"))
            .and_then(|name| name.as_str())
            .unwrap_or("unknown");
        info!("Authorized on Telegram as bot @{}", username);
        Ok(())
    }

    async fn send(
        &self,
        destination: &str,
        notification: &AlertNotification,
    ) -> Result<(), DispatchError> {
        let text = notification.text();
        let request = SendMessageRequest {
            chat_id: destination,
            text: &text,
            disable_web_page_preview: true,
        };

        let response = self
            .client
            .post(format!("{}/sendMessage", self.bot_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| request_error(TELEGRAM, e))?;

        self.read_response(response).await.map(|_| ())
    }
}

/// Generic JSON webhook transport; the destination is the webhook URL
pub struct WebhookNotifier {
    client: Client,
}

impl WebhookNotifier {
    pub fn new() -> Result<Self, DispatchError> {
        Ok(Self {
            client: http_client(WEBHOOK)?,
        })
    }
}

fn webhook_url(destination: &str) -> Result<Url, DispatchError> {
    let url = Url::parse(destination).map_err(|e| DispatchError::InvalidDestination {
        transport: WEBHOOK.to_string(),
        reason: format!("invalid webhook URL '{}': {}", destination, e),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(DispatchError::InvalidDestination {
            transport: WEBHOOK.to_string(),
            reason: format!("unsupported webhook URL scheme '{}'", other),
        }),
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn transport(&self) -> &str {
        WEBHOOK
    }

    async fn verify(&self, destination: &str) -> Result<(), DispatchError> {
        let url = webhook_url(destination)?;
        info!("Webhook notifications will be posted to {}", url);
        Ok(())
    }

    async fn send(
        &self,
        destination: &str,
        notification: &AlertNotification,
    ) -> Result<(), DispatchError> {
        let url = webhook_url(destination)?;

        let response = self
            .client
            .post(url)
            .json(notification)
            .send()
            .await
            .map_err(|e| request_error(WEBHOOK, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(DispatchError::Rejected {
            transport: WEBHOOK.to_string(),
            status: status.as_u16(),
            reason: truncate_body(&body),
        })
    }
}
