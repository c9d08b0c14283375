//! This module provides reusable test utilities:
//! - Mock HTTP servers (node RPC, Telegram Bot API)
//! - Test configuration builders
//! - Scheduler wiring against those mocks

// Allow unused code in test fixtures - not every test binary uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod harness;
pub mod mock_rpc;
pub mod mock_telegram;
pub mod test_config;

// Re-export commonly used items
pub use harness::*;
pub use mock_rpc::MockRpcServer;
pub use mock_telegram::{MockTelegramServer, TEST_BOT_TOKEN, TEST_CHAT_ID};
pub use test_config::{TestConfigBuilder, TestConfigFile};
