//! Custom error types for the node monitor
//!
//! Observation errors never leave a health check; they are folded into an
//! `Unreachable` result. Dispatch errors are logged by the scheduler. Only
//! configuration errors are fatal, and only before the loop starts.

use std::fmt;

/// Main error type for library callers
#[derive(Debug)]
pub enum MonitorError {
    /// Configuration-related errors
    Config(ConfigError),

    /// Notification delivery errors
    Dispatch(DispatchError),

    /// Other errors with context
    Other(String),
}

/// Configuration error variants
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to load configuration file
    LoadFailed { path: String, reason: String },

    /// Invalid configuration value
    InvalidValue { field: String, reason: String },

    /// Missing required configuration
    MissingRequired { field: String },

    /// Configuration parsing error
    ParseError { reason: String },
}

/// Failure to observe the node over RPC
#[derive(Debug, Clone, PartialEq)]
pub enum ObservationError {
    /// Request did not complete within the check timeout
    Timeout { url: String },

    /// Connection refused, DNS failure, reset, etc.
    ConnectionFailed { url: String, reason: String },

    /// Node answered with a non-2xx status
    HttpStatus { url: String, status: u16, body: String },

    /// Body was not the JSON shape we expected
    Decode { url: String, reason: String },

    /// Node answered with a JSON-RPC error envelope
    Rpc { code: i64, message: String },
}

/// Notification delivery error variants
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// Could not reach the notification service
    ConnectionFailed { transport: String, reason: String },

    /// Notification call exceeded the dispatch timeout
    Timeout { transport: String },

    /// Service reachable but refused the message
    Rejected {
        transport: String,
        status: u16,
        reason: String,
    },

    /// Service answered with something we could not interpret
    InvalidResponse { transport: String, reason: String },

    /// Destination cannot be delivered to, e.g. a malformed webhook URL
    InvalidDestination { transport: String, reason: String },
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::Config(e) => write!(f, "Configuration error: {}", e),
            MonitorError::Dispatch(e) => write!(f, "Dispatch error: {}", e),
            MonitorError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path, reason)
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
            ConfigError::MissingRequired { field } => {
                write!(f, "Missing required field: {}", field)
            }
            ConfigError::ParseError { reason } => {
                write!(f, "Failed to parse config: {}", reason)
            }
        }
    }
}

impl fmt::Display for ObservationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationError::Timeout { url } => write!(f, "request to {} timed out", url),
            ObservationError::ConnectionFailed { url, reason } => {
                write!(f, "request to {} failed: {}", url, reason)
            }
            ObservationError::HttpStatus { url, status, body } => {
                if body.is_empty() {
                    write!(f, "{} returned HTTP {}", url, status)
                } else {
                    write!(f, "{} returned HTTP {}: {}", url, status, body)
                }
            }
            ObservationError::Decode { url, reason } => {
                write!(f, "malformed response from {}: {}", url, reason)
            }
            ObservationError::Rpc { code, message } => {
                write!(f, "RPC error {}: {}", code, message)
            }
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::ConnectionFailed { transport, reason } => {
                write!(f, "{} delivery failed: {}", transport, reason)
            }
            DispatchError::Timeout { transport } => {
                write!(f, "{} delivery timed out", transport)
            }
            DispatchError::Rejected {
                transport,
                status,
                reason,
            } => {
                write!(f, "{} rejected message (HTTP {}): {}", transport, status, reason)
            }
            DispatchError::InvalidResponse { transport, reason } => {
                write!(f, "invalid response from {}: {}", transport, reason)
            }
            DispatchError::InvalidDestination { transport, reason } => {
                write!(f, "invalid {} destination: {}", transport, reason)
            }
        }
    }
}

impl std::error::Error for MonitorError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for ObservationError {}
impl std::error::Error for DispatchError {}

impl From<anyhow::Error> for MonitorError {
    fn from(err: anyhow::Error) -> Self {
        MonitorError::Other(err.to_string())
    }
}

impl From<ConfigError> for MonitorError {
    fn from(err: ConfigError) -> Self {
        MonitorError::Config(err)
    }
}

impl From<DispatchError> for MonitorError {
    fn from(err: DispatchError) -> Self {
        MonitorError::Dispatch(err)
    }
}
