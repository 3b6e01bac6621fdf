//! # Error Types
//!
//! Structured errors for the sentinel core. Probe and alert-sink failures have their own
//! types because they never escape an evaluation cycle; `SentinelError` covers the
//! caller-visible surface (registration, configuration, lifecycle misuse).

use std::any::Any;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SentinelError {
    #[error("Component already registered: {id}")]
    DuplicateComponent { id: String },
    #[error("Invalid registration: {0}")]
    InvalidRegistration(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl From<config::ConfigError> for SentinelError {
    fn from(err: config::ConfigError) -> Self {
        SentinelError::ConfigurationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SentinelError>;

/// Best-effort text of a caught panic payload
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Failure reported by (or on behalf of) a health probe
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("Probe failed: {0}")]
    Failed(String),
    #[error("Probe timed out after {timeout_ms}ms")]
    TimedOut { timeout_ms: u64 },
    #[error("Probe panicked: {0}")]
    Panicked(String),
}

impl ProbeError {
    pub fn failed(msg: impl Into<String>) -> Self {
        ProbeError::Failed(msg.into())
    }
}

/// Failure reported by an alert sink
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlertError {
    #[error("Alert channel is closed")]
    ChannelClosed,
    #[error("Alert delivery failed: {0}")]
    Delivery(String),
}
