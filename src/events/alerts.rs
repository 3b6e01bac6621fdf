//! # Alert Sinks
//!
//! The core decides whether an alert fires and at what severity; a sink decides how it is
//! delivered. Sinks are fire-and-forget: an error returned here is logged by the caller and
//! never undoes the transition that triggered it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tokio::sync::mpsc;

use crate::constants::AlertSeverity;
use crate::error::AlertError;

pub trait AlertSink: Send + Sync + Debug {
    fn alert(&self, severity: AlertSeverity, message: &str) -> Result<(), AlertError>;
}

/// Alert as forwarded by [`ChannelAlertSink`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertNotification {
    pub severity: AlertSeverity,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

/// Writes alerts to the tracing pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAlertSink;

impl AlertSink for TracingAlertSink {
    fn alert(&self, severity: AlertSeverity, message: &str) -> Result<(), AlertError> {
        match severity {
            AlertSeverity::Warning => tracing::warn!(severity = %severity, "ALERT: {message}"),
            AlertSeverity::High | AlertSeverity::Critical => {
                tracing::error!(severity = %severity, "ALERT: {message}")
            }
        }
        Ok(())
    }
}

/// Forwards alerts to a host-owned channel
#[derive(Debug, Clone)]
pub struct ChannelAlertSink {
    sender: mpsc::UnboundedSender<AlertNotification>,
}

impl ChannelAlertSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AlertNotification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl AlertSink for ChannelAlertSink {
    fn alert(&self, severity: AlertSeverity, message: &str) -> Result<(), AlertError> {
        self.sender
            .send(AlertNotification {
                severity,
                message: message.to_string(),
                raised_at: Utc::now(),
            })
            .map_err(|_| AlertError::ChannelClosed)
    }
}

/// Discards every alert
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAlertSink;

impl AlertSink for NoopAlertSink {
    fn alert(&self, _severity: AlertSeverity, _message: &str) -> Result<(), AlertError> {
        Ok(())
    }
}
