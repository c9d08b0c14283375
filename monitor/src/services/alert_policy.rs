//! Edge-triggered alerting with periodic reminders
//!
//! `AlertPolicy::evaluate` is a pure function of the fresh result and the
//! remembered state for that check. It alerts on the transition into an
//! unhealthy status, re-alerts once per cooldown while the problem persists,
//! and emits a single recovery notice when the check turns healthy again.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};

use crate::health::{CheckResult, CheckStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionKind {
    Alert,
    Cleared,
    NoChange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertDecision {
    pub kind: DecisionKind,
    pub message: String,
}

impl AlertDecision {
    fn alert(message: String) -> Self {
        Self {
            kind: DecisionKind::Alert,
            message,
        }
    }

    fn cleared(message: String) -> Self {
        Self {
            kind: DecisionKind::Cleared,
            message,
        }
    }

    fn no_change() -> Self {
        Self {
            kind: DecisionKind::NoChange,
            message: String::new(),
        }
    }

    /// Whether this decision should reach the notification channel
    pub fn should_notify(&self) -> bool {
        self.kind != DecisionKind::NoChange
    }
}

/// Remembered alerting condition of one check
#[derive(Debug, Clone, PartialEq)]
pub struct AlertState {
    pub last_status: CheckStatus,
    pub last_alerted_at: Option<DateTime<Utc>>,
}

impl Default for AlertState {
    fn default() -> Self {
        Self {
            last_status: CheckStatus::Healthy,
            last_alerted_at: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AlertPolicy {
    cooldown: ChronoDuration,
}

impl AlertPolicy {
    pub fn new(cooldown: ChronoDuration) -> Self {
        Self { cooldown }
    }

    /// Decide what to do with a fresh result given the check's prior state
    pub fn evaluate(&self, result: &CheckResult, state: &AlertState) -> (AlertDecision, AlertState) {
        let now = result.observed_at;
        let was_healthy = state.last_status.is_healthy();

        match (result.status.is_healthy(), was_healthy) {
            (true, false) => (
                AlertDecision::cleared(format!("{} recovered", result.check_name)),
                AlertState::default(),
            ),
            (true, true) => (AlertDecision::no_change(), state.clone()),
            (false, true) => (
                AlertDecision::alert(format!(
                    "{} {}: {}",
                    result.check_name, result.status, result.detail
                )),
                AlertState {
                    last_status: result.status,
                    last_alerted_at: Some(now),
                },
            ),
            (false, false) => {
                let cooled_down = state
                    .last_alerted_at
                    .is_none_or(|alerted_at| now - alerted_at >= self.cooldown);

                if cooled_down {
                    (
                        AlertDecision::alert(format!(
                            "{} still {}: {}",
                            result.check_name, result.status, result.detail
                        )),
                        AlertState {
                            last_status: result.status,
                            last_alerted_at: Some(now),
                        },
                    )
                } else {
                    (
                        AlertDecision::no_change(),
                        AlertState {
                            last_status: result.status,
                            last_alerted_at: state.last_alerted_at,
                        },
                    )
                }
            }
        }
    }
}
