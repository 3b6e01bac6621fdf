//! # Sentinel Configuration System
//!
//! Typed configuration for the health orchestrator. Every field has a built-in default so a
//! host can embed the core without any configuration files; files and environment variables
//! only override.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sentinel_core::config::ConfigLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::load()?;
//! let interval = config.monitor.evaluation_interval();
//! # Ok(())
//! # }
//! ```

pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::system;
use crate::error::{Result, SentinelError};

pub use loader::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SentinelConfig {
    /// Evaluation cycle settings
    pub monitor: MonitorConfig,

    /// Component registration behaviour
    pub registration: RegistrationConfig,

    /// Structured logging settings
    pub logging: LoggingConfig,
}

impl SentinelConfig {
    pub fn validate(&self) -> Result<()> {
        self.monitor.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub evaluation_interval_ms: u64,
    /// Upper bound on one probe invocation; 0 disables the bound
    pub probe_timeout_ms: u64,
    /// Adaptation events kept in memory, oldest evicted first
    pub history_capacity: usize,
    /// Adaptation events included in a report
    pub report_event_limit: usize,
    pub status_change_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            evaluation_interval_ms: system::DEFAULT_EVALUATION_INTERVAL_MS,
            probe_timeout_ms: system::DEFAULT_PROBE_TIMEOUT_MS,
            history_capacity: system::DEFAULT_HISTORY_CAPACITY,
            report_event_limit: system::DEFAULT_REPORT_EVENT_LIMIT,
            status_change_capacity: system::DEFAULT_STATUS_CHANGE_CAPACITY,
        }
    }
}

impl MonitorConfig {
    pub fn evaluation_interval(&self) -> Duration {
        Duration::from_millis(self.evaluation_interval_ms)
    }

    pub fn probe_timeout(&self) -> Option<Duration> {
        (self.probe_timeout_ms > 0).then(|| Duration::from_millis(self.probe_timeout_ms))
    }

    fn validate(&self) -> Result<()> {
        if self.evaluation_interval_ms == 0 {
            return Err(SentinelError::ConfigurationError(
                "monitor.evaluation_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.history_capacity == 0 {
            return Err(SentinelError::ConfigurationError(
                "monitor.history_capacity must be greater than 0".to_string(),
            ));
        }
        if self.status_change_capacity == 0 {
            return Err(SentinelError::ConfigurationError(
                "monitor.status_change_capacity must be greater than 0".to_string(),
            ));
        }
        if self.report_event_limit > self.history_capacity {
            return Err(SentinelError::ConfigurationError(format!(
                "monitor.report_event_limit ({}) cannot exceed monitor.history_capacity ({})",
                self.report_event_limit, self.history_capacity
            )));
        }
        Ok(())
    }
}

/// What `register` does when a component id is already present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    #[default]
    Reject,
    Replace,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistrationConfig {
    pub duplicate_policy: DuplicatePolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Filter directive overriding the environment default (e.g. "sentinel_core=trace")
    pub level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SentinelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.monitor.evaluation_interval(), Duration::from_secs(30));
        assert_eq!(config.monitor.probe_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.registration.duplicate_policy, DuplicatePolicy::Reject);
    }

    #[test]
    fn test_zero_timeout_disables_bound() {
        let monitor = MonitorConfig {
            probe_timeout_ms: 0,
            ..MonitorConfig::default()
        };
        assert_eq!(monitor.probe_timeout(), None);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = SentinelConfig::default();
        config.monitor.evaluation_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = SentinelConfig::default();
        config.monitor.report_event_limit = config.monitor.history_capacity + 1;
        assert!(matches!(
            config.validate(),
            Err(SentinelError::ConfigurationError(msg)) if msg.contains("report_event_limit")
        ));
    }
}
