use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::adaptation_event::AdaptationEvent;
use crate::state_machine::{HealthStatus, OperationMode};

/// Read-only view of the system as of the last completed evaluation cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub mode: OperationMode,
    pub health: HealthStatus,
    /// Hemisphere components that are not offline
    pub active_hemispheres: Vec<String>,
    pub offline_extremities: Vec<String>,
    pub last_evaluated_at: Option<DateTime<Utc>>,
    /// Number of completed evaluation cycles
    pub cycle: u64,
    pub history: Vec<AdaptationEvent>,
}

impl Default for SystemSnapshot {
    fn default() -> Self {
        Self {
            mode: OperationMode::Complete,
            health: HealthStatus::Optimal,
            active_hemispheres: Vec::new(),
            offline_extremities: Vec::new(),
            last_evaluated_at: None,
            cycle: 0,
            history: Vec::new(),
        }
    }
}
