//! # System Constants
//!
//! Component tiers, alert severities and the numeric boundaries that define how the
//! sentinel core classifies component health.

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export state types for convenience
pub use crate::state_machine::{HealthStatus, OperationMode, SchedulerState};

/// Tier of a monitored component, ordered by blast radius (largest first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Failure is fatal to the whole system
    Core,
    /// Major internal subsystem; essential ones force a reduced mode when lost
    Hemisphere,
    /// Peripheral internal feature
    Extremity,
    /// External dependency with the smallest blast radius
    Ramification,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Core => "core",
            ComponentKind::Hemisphere => "hemisphere",
            ComponentKind::Extremity => "extremity",
            ComponentKind::Ramification => "ramification",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "core" => Ok(Self::Core),
            "hemisphere" => Ok(Self::Hemisphere),
            "extremity" => Ok(Self::Extremity),
            "ramification" => Ok(Self::Ramification),
            _ => Err(format!("Invalid component kind: {s}")),
        }
    }
}

/// Severity attached to an alert fired on a degraded mode transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Warning,
    High,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Warning => "warning",
            AlertSeverity::High => "high",
            AlertSeverity::Critical => "critical",
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure-count thresholds and operational defaults
pub mod system {
    /// Consecutive failures at which a component is `Degraded`
    pub const DEGRADED_FAILURE_THRESHOLD: u32 = 1;

    /// Consecutive failures at which a component is `Critical`
    pub const CRITICAL_FAILURE_THRESHOLD: u32 = 2;

    /// Consecutive failures at which a component is `Offline`
    pub const OFFLINE_FAILURE_THRESHOLD: u32 = 3;

    /// Default evaluation interval
    pub const DEFAULT_EVALUATION_INTERVAL_MS: u64 = 30_000;

    /// Default bound on a single probe invocation
    pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 10_000;

    /// Default number of adaptation events retained in memory
    pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

    /// Default number of adaptation events included in a report
    pub const DEFAULT_REPORT_EVENT_LIMIT: usize = 10;

    /// Default number of per-component status changes retained in memory
    pub const DEFAULT_STATUS_CHANGE_CAPACITY: usize = 200;

    /// Capacity of the adaptation event broadcast channel
    pub const ADAPTATION_CHANNEL_CAPACITY: usize = 64;
}
