//! Binary up/down check against the health endpoint

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::types::CheckResult;
use super::HealthCheck;
use crate::constants::checks;
use crate::errors::ObservationError;
use crate::rpc::{truncate_body, RpcClient};

pub struct LivenessCheck {
    client: RpcClient,
    url: String,
}

impl LivenessCheck {
    pub fn new(client: RpcClient, url: String) -> Self {
        Self { client, url }
    }
}

/// A healthy node answers `{}`, an empty body, or a JSON-RPC envelope with an empty result
fn is_healthy_body(body: &str) -> bool {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return true;
    }

    let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
        return false;
    };

    if is_empty_object(&value) {
        return true;
    }

    let error_absent = value.get("error").is_none_or(Value::is_null);
    value.get("result").is_some_and(is_empty_object) && error_absent
}

fn is_empty_object(value: &Value) -> bool {
    value.as_object().is_some_and(|map| map.is_empty())
}

#[async_trait]
impl HealthCheck for LivenessCheck {
    fn name(&self) -> &str {
        checks::LIVENESS
    }

    async fn observe(&self) -> CheckResult {
        let response = match self.client.get(&self.url).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Liveness check could not reach node: {}", e);
                return CheckResult::unreachable(checks::LIVENESS, e.to_string());
            }
        };

        if !response.is_success() {
            let error = ObservationError::HttpStatus {
                url: self.url.clone(),
                status: response.status,
                body: truncate_body(&response.body),
            };
            warn!("Liveness check failed: {}", error);
            return CheckResult::unreachable(checks::LIVENESS, error.to_string());
        }

        if is_healthy_body(&response.body) {
            debug!("Node is healthy");
            CheckResult::healthy(checks::LIVENESS, "health endpoint responded")
        } else {
            warn!("Unexpected health response: {}", response.body);
            CheckResult::degraded(
                checks::LIVENESS,
                format!(
                    "unexpected health response: {}",
                    truncate_body(&response.body)
                ),
            )
        }
    }
}
