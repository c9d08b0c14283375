//! Shared RPC utilities for querying the node
//!
//! Every failure is returned as an `ObservationError` so health checks can
//! turn it into an `Unreachable` result instead of dropping it.

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::error::Error as StdError;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use crate::constants::alerts::MAX_DETAIL_BODY_CHARS;
use crate::errors::ObservationError;
use crate::health::types::RpcEnvelope;

/// Raw HTTP answer from the node
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone)]
pub struct RpcClient {
    client: Client,
    request_timeout: Duration,
}

impl RpcClient {
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            request_timeout,
        })
    }

    /// GET a URL and return status and body, whatever the status
    pub async fn get(&self, url: &str) -> Result<RawResponse, ObservationError> {
        debug!("GET {}", url);

        let response = timeout(self.request_timeout, self.client.get(url).send())
            .await
            .map_err(|_| ObservationError::Timeout {
                url: url.to_string(),
            })?
            .map_err(|e| map_request_error(url, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| map_request_error(url, e))?;

        Ok(RawResponse { status, body })
    }

    /// GET a URL, require 2xx, and decode the body as JSON
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ObservationError> {
        let response = self.get(url).await?;

        if !response.is_success() {
            return Err(ObservationError::HttpStatus {
                url: url.to_string(),
                status: response.status,
                body: truncate_body(&response.body),
            });
        }

        serde_json::from_str(&response.body).map_err(|e| ObservationError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// GET a JSON-RPC endpoint and unwrap its `result`
    pub async fn get_rpc_result<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, ObservationError> {
        let envelope: RpcEnvelope<T> = self.get_json(url).await?;

        match (envelope.result, envelope.error) {
            (_, Some(error)) => Err(ObservationError::Rpc {
                code: error.code,
                message: error.message,
            }),
            (Some(result), None) => Ok(result),
            (None, None) => Err(ObservationError::Decode {
                url: url.to_string(),
                reason: "response has neither result nor error".to_string(),
            }),
        }
    }
}

fn map_request_error(url: &str, err: reqwest::Error) -> ObservationError {
    if err.is_timeout() {
        return ObservationError::Timeout {
            url: url.to_string(),
        };
    }

    ObservationError::ConnectionFailed {
        url: url.to_string(),
        reason: error_chain(&err.without_url()),
    }
}

/// Flatten an error and its sources into one line
pub fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Clip a response body so diagnostics stay one readable line
pub fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_DETAIL_BODY_CHARS {
        return trimmed.to_string();
    }
    let clipped: String = trimmed.chars().take(MAX_DETAIL_BODY_CHARS).collect();
    format!("{}...", clipped)
}
