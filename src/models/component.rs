//! # Component Model
//!
//! A monitored unit: static metadata fixed at registration plus the transient health fields
//! that the probe executor rewrites every cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::constants::ComponentKind;
use crate::orchestration::probe::HealthProbe;
use crate::state_machine::HealthStatus;

/// Transient health of a component, rewritten on every check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    pub consecutive_failures: u32,
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl Default for ComponentHealth {
    fn default() -> Self {
        Self {
            status: HealthStatus::Optimal,
            consecutive_failures: 0,
            last_checked_at: None,
        }
    }
}

/// A monitored component
#[derive(Debug, Clone)]
pub struct Component {
    id: String,
    name: String,
    kind: ComponentKind,
    depends_on: BTreeSet<String>,
    is_essential: bool,
    probe: Arc<dyn HealthProbe>,
    health: ComponentHealth,
}

impl Component {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: ComponentKind,
        probe: Arc<dyn HealthProbe>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            depends_on: BTreeSet::new(),
            is_essential: false,
            probe,
            health: ComponentHealth::default(),
        }
    }

    /// Declare informational dependency edges
    pub fn depends_on<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Mark the component as essential. Only consulted for `Hemisphere` components.
    pub fn essential(mut self, is_essential: bool) -> Self {
        self.is_essential = is_essential;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn dependencies(&self) -> &BTreeSet<String> {
        &self.depends_on
    }

    pub fn is_essential(&self) -> bool {
        self.is_essential
    }

    /// True for an essential `Hemisphere`, the only kind where essentiality matters
    pub fn is_essential_hemisphere(&self) -> bool {
        self.kind == ComponentKind::Hemisphere && self.is_essential
    }

    pub fn probe(&self) -> Arc<dyn HealthProbe> {
        Arc::clone(&self.probe)
    }

    pub fn health(&self) -> ComponentHealth {
        self.health
    }

    pub fn status(&self) -> HealthStatus {
        self.health.status
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.health.consecutive_failures
    }

    pub fn last_checked_at(&self) -> Option<DateTime<Utc>> {
        self.health.last_checked_at
    }

    /// A single success resets the component immediately
    pub(crate) fn record_success(&mut self, checked_at: DateTime<Utc>) {
        self.health = ComponentHealth {
            status: HealthStatus::Optimal,
            consecutive_failures: 0,
            last_checked_at: Some(checked_at),
        };
    }

    pub(crate) fn record_failure(&mut self, checked_at: DateTime<Utc>) {
        let consecutive_failures = self.health.consecutive_failures.saturating_add(1);
        self.health = ComponentHealth {
            status: HealthStatus::from_failures(consecutive_failures),
            consecutive_failures,
            last_checked_at: Some(checked_at),
        };
    }

    pub(crate) fn set_health(&mut self, health: ComponentHealth) {
        self.health = health;
    }
}
