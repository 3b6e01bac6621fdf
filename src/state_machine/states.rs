use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{system, AlertSeverity};

/// Per-component health, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Last probe succeeded
    Optimal,
    /// One consecutive failure
    Degraded,
    /// Two consecutive failures
    Critical,
    /// Three or more consecutive failures
    Offline,
}

impl HealthStatus {
    /// Status is a pure function of the consecutive failure count
    pub fn from_failures(consecutive_failures: u32) -> Self {
        if consecutive_failures >= system::OFFLINE_FAILURE_THRESHOLD {
            Self::Offline
        } else if consecutive_failures >= system::CRITICAL_FAILURE_THRESHOLD {
            Self::Critical
        } else if consecutive_failures >= system::DEGRADED_FAILURE_THRESHOLD {
            Self::Degraded
        } else {
            Self::Optimal
        }
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, Self::Optimal)
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Offline)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Optimal => "optimal",
            Self::Degraded => "degraded",
            Self::Critical => "critical",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HealthStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "optimal" => Ok(Self::Optimal),
            "degraded" => Ok(Self::Degraded),
            "critical" => Ok(Self::Critical),
            "offline" => Ok(Self::Offline),
            _ => Err(format!("Invalid health status: {s}")),
        }
    }
}

/// System-wide operating mode, each variant strictly less capable than the previous
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationMode {
    Complete,
    Essential,
    Critical,
    Emergency,
}

impl OperationMode {
    /// Short human phrase used in adaptation event descriptions
    pub fn phrase(&self) -> &'static str {
        match self {
            Self::Complete => "full capability",
            Self::Essential => "essential services only",
            Self::Critical => "critical functions only",
            Self::Emergency => "emergency operation",
        }
    }

    /// Severity of the alert fired when entering this mode; `Complete` never alerts
    pub fn alert_severity(&self) -> Option<AlertSeverity> {
        match self {
            Self::Complete => None,
            Self::Essential => Some(AlertSeverity::Warning),
            Self::Critical => Some(AlertSeverity::High),
            Self::Emergency => Some(AlertSeverity::Critical),
        }
    }

    pub fn is_degraded(&self) -> bool {
        !matches!(self, Self::Complete)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Essential => "essential",
            Self::Critical => "critical",
            Self::Emergency => "emergency",
        }
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "complete" => Ok(Self::Complete),
            "essential" => Ok(Self::Essential),
            "critical" => Ok(Self::Critical),
            "emergency" => Ok(Self::Emergency),
            _ => Err(format!("Invalid operation mode: {s}")),
        }
    }
}

/// Lifecycle of the monitoring scheduler, orthogonal to [`OperationMode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    Stopped,
    Running,
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "stopped"),
            Self::Running => write!(f, "running"),
        }
    }
}
