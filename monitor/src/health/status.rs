//! Block height and staleness check against the status endpoint

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::types::{CheckResult, StatusResult};
use super::HealthCheck;
use crate::constants::checks;
use crate::errors::ObservationError;
use crate::rpc::RpcClient;

/// Last height seen and when it last moved forward
#[derive(Debug, Clone)]
struct HeightProgress {
    height: u64,
    last_progressed: DateTime<Utc>,
}

pub struct StatusCheck {
    client: RpcClient,
    url: String,
    height_floor: u64,
    stall_threshold: Option<ChronoDuration>,
    progress: Mutex<Option<HeightProgress>>,
}

impl StatusCheck {
    pub fn new(
        client: RpcClient,
        url: String,
        height_floor: u64,
        stall_threshold: Option<ChronoDuration>,
    ) -> Self {
        Self {
            client,
            url,
            height_floor,
            stall_threshold,
            progress: Mutex::new(None),
        }
    }

    /// Record a height and return how long it has been stuck, if past the threshold
    async fn track_progress(&self, height: u64, now: DateTime<Utc>) -> Option<ChronoDuration> {
        let mut progress = self.progress.lock().await;

        match progress.as_mut() {
            None => {
                debug!("Initializing block height tracking at height {}", height);
                *progress = Some(HeightProgress {
                    height,
                    last_progressed: now,
                });
                None
            }
            Some(state) if height > state.height => {
                if let Some(threshold) = self.stall_threshold {
                    if now - state.last_progressed >= threshold {
                        info!(
                            "Block height progressing again: {} -> {}",
                            state.height, height
                        );
                    }
                }
                state.height = height;
                state.last_progressed = now;
                None
            }
            Some(state) if height < state.height => {
                warn!(
                    "Block height went backwards ({} -> {}), resetting progress baseline",
                    state.height, height
                );
                state.height = height;
                state.last_progressed = now;
                None
            }
            Some(state) => {
                let stuck_for = now - state.last_progressed;
                match self.stall_threshold {
                    Some(threshold) if stuck_for >= threshold => Some(stuck_for),
                    _ => {
                        debug!(
                            "Height {} unchanged for {}s (within grace period)",
                            height,
                            stuck_for.num_seconds()
                        );
                        None
                    }
                }
            }
        }
    }
}

#[async_trait]
impl HealthCheck for StatusCheck {
    fn name(&self) -> &str {
        checks::STATUS
    }

    async fn observe(&self) -> CheckResult {
        let sync_info = match self.client.get_rpc_result::<StatusResult>(&self.url).await {
            Ok(result) => result.sync_info,
            Err(e) => {
                warn!("Status check could not reach node: {}", e);
                return CheckResult::unreachable(checks::STATUS, e.to_string());
            }
        };

        let height = match sync_info.latest_block_height.value() {
            Ok(height) => height,
            Err(reason) => {
                let error = ObservationError::Decode {
                    url: self.url.clone(),
                    reason,
                };
                warn!("Status check got a malformed height: {}", error);
                return CheckResult::unreachable(checks::STATUS, error.to_string());
            }
        };

        let stalled_for = self.track_progress(height, Utc::now()).await;

        if height < self.height_floor {
            return CheckResult::degraded(
                checks::STATUS,
                format!("height {} below floor {}", height, self.height_floor),
            );
        }

        if let Some(stuck_for) = stalled_for {
            return CheckResult::degraded(
                checks::STATUS,
                format!(
                    "height {} not progressing for {}s",
                    height,
                    stuck_for.num_seconds()
                ),
            );
        }

        let detail = if sync_info.catching_up {
            format!("height {}, catching up", height)
        } else {
            format!("height {}", height)
        };
        CheckResult::healthy(checks::STATUS, detail)
    }
}
