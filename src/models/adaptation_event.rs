use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state_machine::{HealthStatus, OperationMode};

/// Immutable record of a system mode transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptationEvent {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    /// Names of every non-optimal component at the time of the transition
    pub trigger: String,
    pub from_mode: OperationMode,
    pub to_mode: OperationMode,
    pub affected_components: Vec<String>,
    pub description: String,
}

impl AdaptationEvent {
    /// True when the transition moved the system to a less capable mode
    pub fn is_degradation(&self) -> bool {
        self.to_mode > self.from_mode
    }
}

/// Audit record of a single component changing status between cycles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub component_id: String,
    pub from_status: HealthStatus,
    pub to_status: HealthStatus,
    pub consecutive_failures: u32,
    pub occurred_at: DateTime<Utc>,
}
