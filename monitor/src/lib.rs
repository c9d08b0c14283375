pub mod config;
pub mod constants;
pub mod errors;
pub mod health;
pub mod rpc;
pub mod scheduler;
pub mod services;

// Re-export commonly used types
pub use config::{Config, ConfigManager, NotifierConfig};
pub use errors::{ConfigError, DispatchError, MonitorError, ObservationError};
pub use health::{build_checks, CheckResult, CheckStatus, HealthCheck};
pub use rpc::RpcClient;
pub use scheduler::{HealthScheduler, SchedulerPhase, TickReport};
pub use services::{AlertDecision, AlertPolicy, AlertState, DecisionKind, Dispatcher};
