use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{info, warn};

use super::alert_policy::AlertDecision;
use super::notifier::{AlertNotification, Notifier};
use crate::constants::alerts::DISPATCH_TIMEOUT;
use crate::errors::DispatchError;
use crate::health::CheckResult;

/// Sends alert decisions through the configured transport and counts outcomes
pub struct Dispatcher {
    notifier: Arc<dyn Notifier>,
    destination: String,
    node_name: Option<String>,
    sent: AtomicU64,
    failures: AtomicU64,
}

impl Dispatcher {
    pub fn new(notifier: Arc<dyn Notifier>, destination: String, node_name: Option<String>) -> Self {
        Self {
            notifier,
            destination,
            node_name,
            sent: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    pub fn transport(&self) -> &str {
        self.notifier.transport()
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Check the transport and destination before the loop starts
    pub async fn verify(&self) -> Result<(), DispatchError> {
        self.notifier.verify(&self.destination).await
    }

    /// Deliver one notification. Failures are counted and returned, never retried.
    pub async fn send(
        &self,
        decision: &AlertDecision,
        result: &CheckResult,
    ) -> Result<(), DispatchError> {
        let notification = AlertNotification {
            timestamp: Utc::now(),
            check_name: result.check_name.clone(),
            kind: decision.kind,
            status: result.status,
            message: decision.message.clone(),
            node_name: self.node_name.clone(),
        };

        let outcome = match timeout(
            DISPATCH_TIMEOUT,
            self.notifier.send(&self.destination, &notification),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(DispatchError::Timeout {
                transport: self.notifier.transport().to_string(),
            }),
        };

        match outcome {
            Ok(()) => {
                self.sent.fetch_add(1, Ordering::Relaxed);
                info!(
                    "{:?} sent via {} for {}: {}",
                    decision.kind,
                    self.notifier.transport(),
                    result.check_name,
                    decision.message
                );
                Ok(())
            }
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    "Failed to send {:?} for {}: {}",
                    decision.kind, result.check_name, e
                );
                Err(e)
            }
        }
    }

    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}
