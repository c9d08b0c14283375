//! Tick-driven scheduling of health checks
//!
//! A single timeline runs ticks strictly one after another. Within a tick
//! every check runs as its own task under a timeout, results are evaluated
//! against the per-check alert state, and Alert/Cleared decisions are
//! dispatched before the scheduler returns to idle.
//!
//! The alert state map is only touched by the scheduler itself, after all
//! check tasks have completed, so each slot has exactly one writer.

pub mod ticker;
pub use ticker::HealthScheduler;

use crate::health::CheckResult;
use crate::services::AlertDecision;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    Idle,
    Running,
}

/// Outcome of one tick, mostly for logging and tests
#[derive(Debug, Clone)]
pub struct TickReport {
    pub tick: u64,
    pub results: Vec<CheckResult>,
    pub decisions: Vec<(String, AlertDecision)>,
    pub dispatch_failures: usize,
}

impl TickReport {
    pub fn result_for(&self, check_name: &str) -> Option<&CheckResult> {
        self.results
            .iter()
            .find(|result| result.check_name == check_name)
    }

    pub fn decision_for(&self, check_name: &str) -> Option<&AlertDecision> {
        self.decisions
            .iter()
            .find(|(name, _)| name == check_name)
            .map(|(_, decision)| decision)
    }

    /// Number of decisions that were handed to the dispatcher
    pub fn notifications(&self) -> usize {
        self.decisions
            .iter()
            .filter(|(_, decision)| decision.should_notify())
            .count()
    }
}
