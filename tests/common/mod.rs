//! Shared helpers for integration tests
#![allow(dead_code)]

pub mod strategies;

use std::sync::Arc;

use sentinel_core::clock::ManualClock;
use sentinel_core::config::SentinelConfig;
use sentinel_core::constants::ComponentKind;
use sentinel_core::models::Component;
use sentinel_core::orchestration::{HealthOrchestrator, HealthProbe};
use sentinel_core::test_utils::RecordingAlertSink;

pub struct TestHarness {
    pub orchestrator: Arc<HealthOrchestrator>,
    pub alerts: Arc<RecordingAlertSink>,
    pub clock: Arc<ManualClock>,
}

/// Orchestrator with default configuration, a manual clock and a recording sink
pub fn harness(components: Vec<Component>) -> TestHarness {
    harness_with_config(SentinelConfig::default(), components)
}

pub fn harness_with_config(config: SentinelConfig, components: Vec<Component>) -> TestHarness {
    let alerts = Arc::new(RecordingAlertSink::new());
    let clock = Arc::new(ManualClock::default());
    let orchestrator = HealthOrchestrator::new(config, clock.clone(), alerts.clone(), components)
        .expect("test orchestrator should build");

    TestHarness {
        orchestrator: Arc::new(orchestrator),
        alerts,
        clock,
    }
}

pub fn component(id: &str, kind: ComponentKind, probe: Arc<dyn HealthProbe>) -> Component {
    Component::new(id, format!("{id} component"), kind, probe)
}
