use futures::future::join_all;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, MissedTickBehavior};
use tracing::{debug, error, info};

use super::{SchedulerPhase, TickReport};
use crate::config::Config;
use crate::constants::scheduler::SUMMARY_EVERY_TICKS;
use crate::errors::MonitorError;
use crate::health::{build_checks, CheckResult, HealthCheck};
use crate::rpc::RpcClient;
use crate::services::{build_notifier, AlertPolicy, AlertState, Dispatcher};

pub struct HealthScheduler {
    checks: Vec<Arc<dyn HealthCheck>>,
    policy: AlertPolicy,
    dispatcher: Arc<Dispatcher>,
    states: HashMap<String, AlertState>,
    interval: Duration,
    check_timeout: Duration,
    phase: SchedulerPhase,
    tick_count: u64,
}

impl HealthScheduler {
    pub fn new(
        checks: Vec<Arc<dyn HealthCheck>>,
        policy: AlertPolicy,
        dispatcher: Arc<Dispatcher>,
        interval: Duration,
        check_timeout: Duration,
    ) -> Self {
        Self {
            checks,
            policy,
            dispatcher,
            states: HashMap::new(),
            interval,
            check_timeout,
            phase: SchedulerPhase::Idle,
            tick_count: 0,
        }
    }

    /// Validate the config, then wire the standard checks and the configured notifier
    pub fn from_config(config: &Config) -> Result<Self, MonitorError> {
        config.validate()?;

        let client = RpcClient::new(config.rpc_timeout())?;
        let checks = build_checks(config, &client);
        let (notifier, destination) = build_notifier(&config.notifier)?;
        let dispatcher = Arc::new(Dispatcher::new(
            notifier,
            destination,
            config.node_name.clone(),
        ));

        Ok(Self::new(
            checks,
            AlertPolicy::new(config.alert_cooldown()),
            dispatcher,
            config.poll_interval(),
            config.rpc_timeout(),
        ))
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn alert_state(&self, check_name: &str) -> Option<&AlertState> {
        self.states.get(check_name)
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Run ticks on the configured interval until `shutdown` resolves.
    ///
    /// Shutdown is only observed between ticks, so a tick in flight always
    /// finishes and leaves the alert state consistent.
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(
            "Health scheduler started: {} checks every {}s",
            self.checks.len(),
            self.interval.as_secs()
        );

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Health scheduler stopping after {} ticks", self.tick_count);
                    break;
                }
                _ = interval.tick() => {
                    self.run_tick().await;
                }
            }
        }
    }

    /// Execute one full check, evaluate, dispatch cycle
    pub async fn run_tick(&mut self) -> TickReport {
        self.phase = SchedulerPhase::Running;
        self.tick_count += 1;

        let results = self.observe_all().await;

        let mut decisions = Vec::with_capacity(results.len());
        let mut dispatch_failures = 0;

        for result in &results {
            let state = self.states.entry(result.check_name.clone()).or_default();
            let (decision, next_state) = self.policy.evaluate(result, state);
            *state = next_state;

            if decision.should_notify() {
                if let Err(e) = self.dispatcher.send(&decision, result).await {
                    debug!(
                        "Notification for {} dropped until the next eligible tick: {}",
                        result.check_name, e
                    );
                    dispatch_failures += 1;
                }
            } else {
                debug!(
                    "{} {} ({}), no notification",
                    result.check_name, result.status, result.detail
                );
            }

            decisions.push((result.check_name.clone(), decision));
        }

        if self.tick_count % SUMMARY_EVERY_TICKS == 0 {
            let unhealthy = results
                .iter()
                .filter(|result| !result.status.is_healthy())
                .count();
            info!(
                "Health monitoring cycle #{}: {}/{} checks unhealthy, {} notifications sent, {} failed",
                self.tick_count,
                unhealthy,
                results.len(),
                self.dispatcher.sent_count(),
                self.dispatcher.failure_count()
            );
        }

        self.phase = SchedulerPhase::Idle;

        TickReport {
            tick: self.tick_count,
            results,
            decisions,
            dispatch_failures,
        }
    }

    /// Run every check concurrently; a timeout or a panic becomes `Unreachable`
    async fn observe_all(&self) -> Vec<CheckResult> {
        let (names, tasks): (Vec<String>, Vec<_>) = self
            .checks
            .iter()
            .map(|check| {
                let check = check.clone();
                let limit = self.check_timeout;
                let name = check.name().to_string();
                let task = tokio::spawn(async move {
                    match timeout(limit, check.observe()).await {
                        Ok(result) => result,
                        Err(_) => CheckResult::unreachable(
                            check.name(),
                            format!("check timed out after {:?}", limit),
                        ),
                    }
                });
                (name, task)
            })
            .unzip();

        let outcomes = join_all(tasks).await;

        names
            .into_iter()
            .zip(outcomes)
            .map(|(name, outcome)| match outcome {
                Ok(result) => result,
                Err(e) => {
                    error!("Health check {} task failed: {}", name, e);
                    CheckResult::unreachable(&name, format!("check aborted: {}", e))
                }
            })
            .collect()
    }
}
