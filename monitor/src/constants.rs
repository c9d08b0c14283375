//! Central repository for default values, timeouts and well-known names
//!
//! Constants are grouped by concern so the config layer, the health checks and
//! the scheduler all read the same source of truth.

use std::time::Duration;

/// Stable check names. These key the alert state map.
pub mod checks {
    pub const STATUS: &str = "status";
    pub const PEERS: &str = "peers";
    pub const LIVENESS: &str = "liveness";
}

/// Default configuration values
pub mod defaults {
    /// Default interval between ticks
    pub const POLL_INTERVAL_SECONDS: u64 = 60;

    /// Default minimum time between repeated alerts for an unresolved check
    pub const ALERT_COOLDOWN_SECONDS: u64 = 3600;

    /// Default per-check RPC timeout
    pub const RPC_TIMEOUT_SECONDS: u64 = 10;

    /// Heights below this are treated as a node that never left genesis.
    /// Chains with a known height should configure their own floor.
    pub const STATUS_HEIGHT_FLOOR: u64 = 1;

    /// Height not progressing for this long marks the node as stalled
    pub const STALL_THRESHOLD_SECONDS: u64 = 300;

    /// Minimum connected peers before the peers check degrades
    pub const MIN_PEERS: usize = 1;

    /// Path appended to the RPC endpoint for the status query
    pub const STATUS_PATH: &str = "/status";

    /// Local CometBFT RPC listener used for net_info and health
    pub const LOCAL_RPC_URL: &str = "http://localhost:26657";

    /// Telegram Bot API base URL
    pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

    /// Default config file location
    pub const CONFIG_PATH: &str = "config/main.toml";
}

/// Alert delivery constants
pub mod alerts {
    use super::Duration;

    /// Upper bound for one outbound notification call
    pub const DISPATCH_TIMEOUT: Duration = Duration::from_secs(10);

    /// Longest response body echoed back into a diagnostic detail
    pub const MAX_DETAIL_BODY_CHARS: usize = 200;
}

/// Scheduler constants
pub mod scheduler {
    /// Log a summary line every this many ticks
    pub const SUMMARY_EVERY_TICKS: u64 = 10;
}
