//! # Adaptation Log
//!
//! Compares each cycle's outcome against the previous one. A change of operating mode
//! becomes an [`AdaptationEvent`]: appended to a bounded history, broadcast to subscribers
//! and, when the new mode is degraded, raised through the alert sink. Component status
//! changes that leave the mode untouched are kept as [`StatusChange`] audit records and
//! logged without alerting.

use std::collections::{HashMap, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::panic_message;
use crate::events::{AdaptationPublisher, AlertSink};
use crate::logging::log_mode_transition;
use crate::models::{AdaptationEvent, Component, StatusChange};
use crate::state_machine::{HealthStatus, OperationMode};

#[derive(Debug)]
pub struct AdaptationLog {
    history: VecDeque<AdaptationEvent>,
    history_capacity: usize,
    status_changes: VecDeque<StatusChange>,
    status_change_capacity: usize,
    /// Mode as of the previous reconciliation
    current_mode: OperationMode,
    /// Component statuses as of the previous reconciliation
    last_statuses: HashMap<String, HealthStatus>,
    alert_sink: Arc<dyn AlertSink>,
    publisher: AdaptationPublisher,
    clock: Arc<dyn Clock>,
}

impl AdaptationLog {
    pub fn new(
        history_capacity: usize,
        status_change_capacity: usize,
        alert_sink: Arc<dyn AlertSink>,
        publisher: AdaptationPublisher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            history: VecDeque::with_capacity(history_capacity),
            history_capacity: history_capacity.max(1),
            status_changes: VecDeque::new(),
            status_change_capacity: status_change_capacity.max(1),
            current_mode: OperationMode::Complete,
            last_statuses: HashMap::new(),
            alert_sink,
            publisher,
            clock,
        }
    }

    /// Record what changed since the previous cycle.
    ///
    /// Returns the adaptation event when the mode changed, `None` otherwise.
    pub fn reconcile(
        &mut self,
        previous_mode: OperationMode,
        new_mode: OperationMode,
        components: &[Component],
    ) -> Option<AdaptationEvent> {
        self.track_status_changes(components);
        self.current_mode = new_mode;

        if new_mode == previous_mode {
            return None;
        }

        let mut degraded: Vec<&Component> = components
            .iter()
            .filter(|c| !c.status().is_optimal())
            .collect();
        degraded.sort_by(|a, b| a.id().cmp(b.id()));

        let trigger = if degraded.is_empty() {
            "all components optimal".to_string()
        } else {
            degraded
                .iter()
                .map(|c| c.name())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let event = AdaptationEvent {
            event_id: Uuid::new_v4(),
            occurred_at: self.clock.now(),
            trigger,
            from_mode: previous_mode,
            to_mode: new_mode,
            affected_components: degraded.iter().map(|c| c.id().to_string()).collect(),
            description: format!("{} → {}", previous_mode.phrase(), new_mode.phrase()),
        };

        log_mode_transition(previous_mode, new_mode, &event.trigger);

        if self.history.len() == self.history_capacity {
            self.history.pop_front();
        }
        self.history.push_back(event.clone());

        self.publisher.publish(event.clone());
        self.raise_alert(&event);

        Some(event)
    }

    /// Mode recorded by the last reconciliation; `Complete` before the first
    pub fn current_mode(&self) -> OperationMode {
        self.current_mode
    }

    /// The newest `n` events, oldest first
    pub fn recent(&self, n: usize) -> Vec<AdaptationEvent> {
        let skip = self.history.len().saturating_sub(n);
        self.history.iter().skip(skip).cloned().collect()
    }

    pub fn history(&self) -> Vec<AdaptationEvent> {
        self.history.iter().cloned().collect()
    }

    pub fn status_changes(&self) -> Vec<StatusChange> {
        self.status_changes.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    fn track_status_changes(&mut self, components: &[Component]) {
        let now = self.clock.now();
        let mut current = HashMap::with_capacity(components.len());

        for component in components {
            let status = component.status();
            // Components start out optimal, so an unseen id is compared against that
            let previous = self
                .last_statuses
                .get(component.id())
                .copied()
                .unwrap_or(HealthStatus::Optimal);

            if previous != status {
                info!(
                    component_id = %component.id(),
                    from_status = %previous,
                    to_status = %status,
                    consecutive_failures = component.consecutive_failures(),
                    "Component status changed"
                );
                if self.status_changes.len() == self.status_change_capacity {
                    self.status_changes.pop_front();
                }
                self.status_changes.push_back(StatusChange {
                    component_id: component.id().to_string(),
                    from_status: previous,
                    to_status: status,
                    consecutive_failures: component.consecutive_failures(),
                    occurred_at: now,
                });
            }
            current.insert(component.id().to_string(), status);
        }

        self.last_statuses = current;
    }

    fn raise_alert(&self, event: &AdaptationEvent) {
        let Some(severity) = event.to_mode.alert_severity() else {
            return;
        };

        let message = format!(
            "System mode changed to {}: {} (trigger: {})",
            event.to_mode, event.description, event.trigger
        );
        let delivery = panic::catch_unwind(AssertUnwindSafe(|| {
            self.alert_sink.alert(severity, &message)
        }));
        let failure = match delivery {
            Ok(Ok(())) => return,
            Ok(Err(e)) => e.to_string(),
            Err(payload) => format!("alert sink panicked: {}", panic_message(payload)),
        };
        error!(
            severity = %severity,
            to_mode = %event.to_mode,
            error = %failure,
            "Alert sink failed; transition stands"
        );
    }
}
