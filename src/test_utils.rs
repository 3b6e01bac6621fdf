//! Test utilities: scripted probes and recording or misbehaving alert sinks.
//!
//! Public so integration tests and the demo binary can drive the orchestrator without real
//! infrastructure behind the probes.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{Notify, Semaphore};

use crate::constants::AlertSeverity;
use crate::error::{AlertError, ProbeError};
use crate::events::AlertSink;
use crate::orchestration::probe::HealthProbe;

/// Replays a fixed sequence of answers, then repeats the last one forever
#[derive(Debug)]
pub struct ScriptedProbe {
    outcomes: Vec<bool>,
    calls: AtomicUsize,
}

impl ScriptedProbe {
    pub fn new(outcomes: impl IntoIterator<Item = bool>) -> Self {
        Self {
            outcomes: outcomes.into_iter().collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthProbe for ScriptedProbe {
    async fn check(&self) -> Result<bool, ProbeError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let answer = self
            .outcomes
            .get(call)
            .or_else(|| self.outcomes.last())
            .copied()
            .unwrap_or(true);
        Ok(answer)
    }
}

/// Probe whose answer can be flipped at runtime; counts invocations
#[derive(Debug)]
pub struct ToggleProbe {
    healthy: AtomicBool,
    calls: AtomicUsize,
}

impl ToggleProbe {
    pub fn new(healthy: bool) -> Self {
        Self {
            healthy: AtomicBool::new(healthy),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthProbe for ToggleProbe {
    async fn check(&self) -> Result<bool, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.healthy.load(Ordering::SeqCst))
    }
}

/// Probe that blocks until released, for observing a cycle while it is in flight
#[derive(Debug)]
pub struct GatedProbe {
    answer: bool,
    gate: Semaphore,
    started: AtomicUsize,
    started_changed: Notify,
}

impl GatedProbe {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            gate: Semaphore::new(0),
            started: AtomicUsize::new(0),
            started_changed: Notify::new(),
        }
    }

    /// Wait until at least `count` checks have started
    pub async fn wait_for_checks(&self, count: usize) {
        loop {
            let notified = self.started_changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.started.load(Ordering::SeqCst) >= count {
                return;
            }
            notified.await;
        }
    }

    /// Let one blocked check complete
    pub fn release(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait]
impl HealthProbe for GatedProbe {
    async fn check(&self) -> Result<bool, ProbeError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.started_changed.notify_waiters();
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| ProbeError::failed(e.to_string()))?;
        permit.forget();
        Ok(self.answer)
    }
}

/// Alert sink that remembers every alert; optionally fails every delivery
#[derive(Debug, Default)]
pub struct RecordingAlertSink {
    alerts: Mutex<Vec<(AlertSeverity, String)>>,
    failing: bool,
}

impl RecordingAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that records the attempt and then reports a delivery failure
    pub fn failing() -> Self {
        Self {
            alerts: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub fn alerts(&self) -> Vec<(AlertSeverity, String)> {
        self.alerts.lock().clone()
    }

    pub fn severities(&self) -> Vec<AlertSeverity> {
        self.alerts.lock().iter().map(|(severity, _)| *severity).collect()
    }
}

impl AlertSink for RecordingAlertSink {
    fn alert(&self, severity: AlertSeverity, message: &str) -> Result<(), AlertError> {
        self.alerts.lock().push((severity, message.to_string()));
        if self.failing {
            return Err(AlertError::Delivery("sink unavailable".to_string()));
        }
        Ok(())
    }
}

/// Alert sink that panics on every delivery; counts the attempts
#[derive(Debug, Default)]
pub struct PanickingAlertSink {
    attempts: AtomicUsize,
}

impl PanickingAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl AlertSink for PanickingAlertSink {
    fn alert(&self, severity: AlertSeverity, message: &str) -> Result<(), AlertError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        panic!("pager offline while raising {severity} alert: {message}");
    }
}
