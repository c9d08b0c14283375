//! Scheduler wiring and scripted collaborators for tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use monitor::services::{AlertNotification, Notifier};
use monitor::{
    AlertPolicy, CheckResult, CheckStatus, Config, DispatchError, Dispatcher, HealthCheck,
    HealthScheduler,
};

/// Build the production scheduler for a config
pub fn scheduler_for(config: &Config) -> HealthScheduler {
    HealthScheduler::from_config(config).expect("Failed to build scheduler")
}

/// A URL on localhost where nothing is listening
pub fn unused_local_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind ephemeral port");
    let port = listener
        .local_addr()
        .expect("Failed to read local address")
        .port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Health check that replays scripted statuses, repeating the last one
pub struct ScriptedCheck {
    name: String,
    script: Mutex<VecDeque<CheckStatus>>,
    last: Mutex<CheckStatus>,
}

impl ScriptedCheck {
    pub fn new(name: &str, script: &[CheckStatus]) -> Self {
        Self {
            name: name.to_string(),
            script: Mutex::new(script.iter().copied().collect()),
            last: Mutex::new(CheckStatus::Healthy),
        }
    }
}

#[async_trait]
impl HealthCheck for ScriptedCheck {
    fn name(&self) -> &str {
        &self.name
    }

    async fn observe(&self) -> CheckResult {
        let mut last = self.last.lock().await;
        if let Some(next) = self.script.lock().await.pop_front() {
            *last = next;
        }
        CheckResult::new(&self.name, *last, format!("scripted {}", *last))
    }
}

/// Health check that never answers within any reasonable timeout
pub struct HangingCheck {
    pub name: String,
}

#[async_trait]
impl HealthCheck for HangingCheck {
    fn name(&self) -> &str {
        &self.name
    }

    async fn observe(&self) -> CheckResult {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        CheckResult::healthy(&self.name, "woke up")
    }
}

/// Health check whose observation panics
pub struct PanickingCheck {
    pub name: String,
}

#[async_trait]
impl HealthCheck for PanickingCheck {
    fn name(&self) -> &str {
        &self.name
    }

    async fn observe(&self) -> CheckResult {
        panic!("probe exploded");
    }
}

/// Notifier that records deliveries and can be told to fail
#[derive(Default)]
pub struct RecordingNotifier {
    pub delivered: Mutex<Vec<AlertNotification>>,
    pub fail: Mutex<bool>,
}

impl RecordingNotifier {
    pub async fn set_failing(&self, fail: bool) {
        *self.fail.lock().await = fail;
    }

    pub async fn messages(&self) -> Vec<String> {
        self.delivered
            .lock()
            .await
            .iter()
            .map(|notification| notification.message.clone())
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn transport(&self) -> &str {
        "recording"
    }

    async fn verify(&self, _destination: &str) -> Result<(), DispatchError> {
        Ok(())
    }

    async fn send(
        &self,
        _destination: &str,
        notification: &AlertNotification,
    ) -> Result<(), DispatchError> {
        if *self.fail.lock().await {
            return Err(DispatchError::Rejected {
                transport: "recording".to_string(),
                status: 503,
                reason: "unavailable".to_string(),
            });
        }
        self.delivered.lock().await.push(notification.clone());
        Ok(())
    }
}

/// Scheduler over arbitrary checks with a recording notifier
pub fn scheduler_with(
    checks: Vec<Arc<dyn HealthCheck>>,
    notifier: Arc<RecordingNotifier>,
    cooldown: chrono::Duration,
    check_timeout: Duration,
) -> HealthScheduler {
    let dispatcher = Arc::new(Dispatcher::new(notifier, "test-destination".to_string(), None));
    HealthScheduler::new(
        checks,
        AlertPolicy::new(cooldown),
        dispatcher,
        Duration::from_secs(60),
        check_timeout,
    )
}
