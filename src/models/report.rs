//! # System Report
//!
//! Serializable summary intended for a host-owned HTTP endpoint or CLI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::adaptation_event::AdaptationEvent;
use super::component::Component;
use super::snapshot::SystemSnapshot;
use crate::constants::ComponentKind;
use crate::state_machine::{HealthStatus, OperationMode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentReport {
    pub id: String,
    pub name: String,
    pub kind: ComponentKind,
    pub status: HealthStatus,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
    pub is_essential: bool,
    pub depends_on: Vec<String>,
}

impl From<&Component> for ComponentReport {
    fn from(component: &Component) -> Self {
        Self {
            id: component.id().to_string(),
            name: component.name().to_string(),
            kind: component.kind(),
            status: component.status(),
            last_checked_at: component.last_checked_at(),
            consecutive_failures: component.consecutive_failures(),
            is_essential: component.is_essential(),
            depends_on: component.dependencies().iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemReport {
    pub mode: OperationMode,
    pub health: HealthStatus,
    pub generated_at: DateTime<Utc>,
    pub last_evaluated_at: Option<DateTime<Utc>>,
    pub components: Vec<ComponentReport>,
    pub active_hemispheres: Vec<String>,
    pub offline_extremities: Vec<String>,
    pub recent_events: Vec<AdaptationEvent>,
}

impl SystemReport {
    /// Build a report from a snapshot, the current components and the newest `event_limit`
    /// adaptation events. Components are sorted by kind, then id.
    pub fn build(
        snapshot: &SystemSnapshot,
        components: &[Component],
        event_limit: usize,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let mut component_reports: Vec<ComponentReport> =
            components.iter().map(ComponentReport::from).collect();
        component_reports.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.id.cmp(&b.id)));

        let skip = snapshot.history.len().saturating_sub(event_limit);
        let recent_events = snapshot.history.iter().skip(skip).cloned().collect();

        Self {
            mode: snapshot.mode,
            health: snapshot.health,
            generated_at,
            last_evaluated_at: snapshot.last_evaluated_at,
            components: component_reports,
            active_hemispheres: snapshot.active_hemispheres.clone(),
            offline_extremities: snapshot.offline_extremities.clone(),
            recent_events,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestration::probe::FnProbe;
    use std::sync::Arc;
    use uuid::Uuid;

    fn event(to_mode: OperationMode) -> AdaptationEvent {
        AdaptationEvent {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            trigger: "cache".to_string(),
            from_mode: OperationMode::Complete,
            to_mode,
            affected_components: vec!["cache".to_string()],
            description: "test".to_string(),
        }
    }

    #[test]
    fn test_report_limits_events_to_most_recent() {
        let snapshot = SystemSnapshot {
            history: vec![
                event(OperationMode::Essential),
                event(OperationMode::Critical),
                event(OperationMode::Emergency),
            ],
            ..SystemSnapshot::default()
        };

        let report = SystemReport::build(&snapshot, &[], 2, Utc::now());
        assert_eq!(report.recent_events.len(), 2);
        assert_eq!(report.recent_events[0].to_mode, OperationMode::Critical);
        assert_eq!(report.recent_events[1].to_mode, OperationMode::Emergency);
    }

    #[test]
    fn test_report_serializes_components() {
        let probe = Arc::new(FnProbe::new("up", || true));
        let components = vec![
            Component::new("api", "Payments API", ComponentKind::Ramification, probe.clone()),
            Component::new("db", "Database", ComponentKind::Core, probe),
        ];

        let report = SystemReport::build(&SystemSnapshot::default(), &components, 10, Utc::now());
        assert_eq!(report.components[0].id, "db");

        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["mode"], "complete");
        assert_eq!(value["components"][1]["kind"], "ramification");
        assert_eq!(value["components"][1]["consecutive_failures"], 0);
    }
}
