//! # Monitoring Scheduler
//!
//! [`HealthOrchestrator`] is the public control surface of the sentinel core. It owns the
//! registry, drives evaluation cycles on a recurring timer, and keeps the snapshot of the
//! last completed cycle for external queries.
//!
//! ## Evaluation cycle
//!
//! 1. Every registered component is probed concurrently; the cycle waits for all of them.
//! 2. Results are written back to the registry.
//! 3. Mode and overall health are recomputed from the probed components.
//! 4. The adaptation log records any transition (and alerts on degraded modes).
//! 5. The new snapshot replaces the previous one.
//!
//! Cycles never overlap: the timer loop and [`HealthOrchestrator::evaluate_now`] share one
//! async lock. Stopping the scheduler never interrupts a cycle that is already running.
//! A panic inside a cycle is caught at the cycle boundary and logged; the previous snapshot
//! stays in place and the timer loop keeps running.

use futures::future::join_all;
use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex as AsyncMutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use super::adaptation_log::AdaptationLog;
use super::health_aggregator::{
    active_hemispheres, compute_mode, compute_overall_health, offline_extremities,
};
use super::probe_executor::ProbeExecutor;
use super::registry::ComponentRegistry;
use crate::clock::Clock;
use crate::config::SentinelConfig;
use crate::error::{panic_message, Result, SentinelError};
use crate::events::{AdaptationPublisher, AlertSink};
use crate::models::{AdaptationEvent, Component, StatusChange, SystemReport, SystemSnapshot};
use crate::state_machine::SchedulerState;

/// Health orchestrator: registry, scheduler and query surface in one instance
///
/// Instances are fully independent; nothing is global.
pub struct HealthOrchestrator {
    inner: Arc<OrchestratorInner>,
    runner: AsyncMutex<Option<RunnerHandle>>,
    running: AtomicBool,
}

struct OrchestratorInner {
    id: Uuid,
    config: SentinelConfig,
    clock: Arc<dyn Clock>,
    registry: ComponentRegistry,
    executor: ProbeExecutor,
    adaptation_log: Mutex<AdaptationLog>,
    publisher: AdaptationPublisher,
    last_cycle: RwLock<CycleRecord>,
    cycle_guard: AsyncMutex<()>,
    cycles: AtomicU64,
}

/// Outcome of the last completed cycle, swapped in as one unit
#[derive(Default)]
struct CycleRecord {
    snapshot: SystemSnapshot,
    components: Vec<Component>,
}

struct RunnerHandle {
    shutdown: Arc<Notify>,
    handle: JoinHandle<()>,
}

impl std::fmt::Debug for HealthOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthOrchestrator")
            .field("id", &self.inner.id)
            .field("components", &self.inner.registry.len())
            .field("running", &self.is_running())
            .field("cycles", &self.cycle_count())
            .finish()
    }
}

impl HealthOrchestrator {
    /// Create an orchestrator with an initial component list
    pub fn new(
        config: SentinelConfig,
        clock: Arc<dyn Clock>,
        alert_sink: Arc<dyn AlertSink>,
        components: Vec<Component>,
    ) -> Result<Self> {
        config.validate()?;

        let id = Uuid::new_v4();
        let publisher = AdaptationPublisher::default();
        let registry = ComponentRegistry::new(config.registration.duplicate_policy);
        for component in components {
            registry.register(component)?;
        }

        let executor = ProbeExecutor::new(clock.clone(), config.monitor.probe_timeout());
        let adaptation_log = AdaptationLog::new(
            config.monitor.history_capacity,
            config.monitor.status_change_capacity,
            alert_sink,
            publisher.clone(),
            clock.clone(),
        );

        info!(
            orchestrator_id = %id,
            components = registry.len(),
            probe_timeout_ms = config.monitor.probe_timeout_ms,
            history_capacity = config.monitor.history_capacity,
            "Health orchestrator created"
        );

        Ok(Self {
            inner: Arc::new(OrchestratorInner {
                id,
                config,
                clock,
                registry,
                executor,
                adaptation_log: Mutex::new(adaptation_log),
                publisher,
                last_cycle: RwLock::new(CycleRecord::default()),
                cycle_guard: AsyncMutex::new(()),
                cycles: AtomicU64::new(0),
            }),
            runner: AsyncMutex::new(None),
            running: AtomicBool::new(false),
        })
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Register a component; it is probed from the next cycle on
    pub fn register(&self, component: Component) -> Result<()> {
        self.inner.registry.register(component)
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.inner.registry
    }

    /// Start periodic evaluation at the configured interval
    pub async fn start_configured(&self) -> Result<()> {
        self.start(self.inner.config.monitor.evaluation_interval())
            .await
    }

    /// Start periodic evaluation.
    ///
    /// Runs one cycle immediately, then one per `interval`. A no-op when already running.
    /// [`is_running`](Self::is_running) reports true from the start of that first cycle.
    #[instrument(skip(self), fields(orchestrator_id = %self.inner.id))]
    pub async fn start(&self, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            return Err(SentinelError::InvalidState(
                "evaluation interval must be greater than zero".to_string(),
            ));
        }

        let mut runner = self.runner.lock().await;
        if runner.is_some() {
            debug!("Scheduler already running");
            return Ok(());
        }

        info!(
            interval_ms = interval.as_millis() as u64,
            "Starting health monitoring scheduler"
        );

        self.running.store(true, Ordering::SeqCst);
        self.inner.run_cycle().await;

        let shutdown = Arc::new(Notify::new());
        let signal = shutdown.clone();
        let inner = Arc::clone(&self.inner);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = signal.notified() => {
                        info!("Health monitoring loop shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        inner.run_cycle().await;
                    }
                }
            }
        });

        *runner = Some(RunnerHandle { shutdown, handle });
        Ok(())
    }

    /// Stop periodic evaluation. Idempotent.
    ///
    /// A cycle already in flight is allowed to finish; this returns once it has.
    #[instrument(skip(self), fields(orchestrator_id = %self.inner.id))]
    pub async fn stop(&self) {
        let runner = self.runner.lock().await.take();
        self.running.store(false, Ordering::SeqCst);

        let Some(RunnerHandle { shutdown, handle }) = runner else {
            debug!("Scheduler already stopped");
            return;
        };

        shutdown.notify_one();
        if let Err(e) = handle.await {
            error!(error = %e, "Health monitoring loop terminated abnormally");
        }
        info!("Health monitoring scheduler stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        if self.is_running() {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        }
    }

    /// Run one evaluation cycle and return the resulting snapshot.
    ///
    /// Never panics into the caller: a cycle that panics leaves the previous snapshot in
    /// place and that snapshot is returned.
    pub async fn evaluate_now(&self) -> SystemSnapshot {
        self.inner.run_cycle().await
    }

    /// Snapshot of the last completed cycle, without evaluating
    pub fn snapshot(&self) -> SystemSnapshot {
        self.inner.last_cycle.read().snapshot.clone()
    }

    pub fn component_status(&self, id: &str) -> Option<Component> {
        self.inner.registry.get(id)
    }

    pub fn cycle_count(&self) -> u64 {
        self.inner.cycles.load(Ordering::SeqCst)
    }

    /// The newest `n` adaptation events, oldest first
    pub fn recent_events(&self, n: usize) -> Vec<AdaptationEvent> {
        self.inner.adaptation_log.lock().recent(n)
    }

    pub fn status_changes(&self) -> Vec<StatusChange> {
        self.inner.adaptation_log.lock().status_changes()
    }

    /// Subscribe to adaptation events as they happen
    pub fn subscribe(&self) -> broadcast::Receiver<AdaptationEvent> {
        self.inner.publisher.subscribe()
    }

    /// Serializable report of the last completed cycle.
    ///
    /// Mode, health and component details all come from the same cycle; components
    /// registered since then appear in the next report.
    pub fn report(&self) -> SystemReport {
        let last_cycle = self.inner.last_cycle.read();
        SystemReport::build(
            &last_cycle.snapshot,
            &last_cycle.components,
            self.inner.config.monitor.report_event_limit,
            self.inner.clock.now(),
        )
    }
}

impl Drop for HealthOrchestrator {
    fn drop(&mut self) {
        if let Ok(mut runner) = self.runner.try_lock() {
            if let Some(runner) = runner.take() {
                runner.shutdown.notify_one();
            }
        }
    }
}

impl OrchestratorInner {
    async fn run_cycle(&self) -> SystemSnapshot {
        match AssertUnwindSafe(self.evaluate()).catch_unwind().await {
            Ok(snapshot) => snapshot,
            Err(payload) => {
                error!(
                    orchestrator_id = %self.id,
                    panic = %panic_message(payload),
                    "Evaluation cycle panicked; keeping previous snapshot"
                );
                self.last_cycle.read().snapshot.clone()
            }
        }
    }

    async fn evaluate(&self) -> SystemSnapshot {
        let _cycle = self.cycle_guard.lock().await;
        let cycle = self.cycles.load(Ordering::SeqCst) + 1;

        let mut checked_out = self.registry.checkout();
        debug!(
            orchestrator_id = %self.id,
            cycle = cycle,
            components = checked_out.len(),
            "Starting evaluation cycle"
        );

        let outcomes = join_all(
            checked_out
                .iter_mut()
                .map(|(_, component)| self.executor.check(component)),
        )
        .await;
        let failed = outcomes.iter().filter(|o| !o.is_success()).count();

        for (generation, component) in &checked_out {
            self.registry
                .apply_health(component.id(), *generation, component.health());
        }

        let components: Vec<Component> = checked_out
            .into_iter()
            .map(|(_, component)| component)
            .collect();
        let mode = compute_mode(&components);
        let health = compute_overall_health(&components);
        let history = {
            let mut log = self.adaptation_log.lock();
            let previous_mode = log.current_mode();
            log.reconcile(previous_mode, mode, &components);
            log.history()
        };

        let snapshot = SystemSnapshot {
            mode,
            health,
            active_hemispheres: active_hemispheres(&components),
            offline_extremities: offline_extremities(&components),
            last_evaluated_at: Some(self.clock.now()),
            cycle,
            history,
        };
        *self.last_cycle.write() = CycleRecord {
            snapshot: snapshot.clone(),
            components,
        };
        self.cycles.store(cycle, Ordering::SeqCst);

        debug!(
            orchestrator_id = %self.id,
            cycle = cycle,
            mode = %mode,
            health = %health,
            failed_probes = failed,
            "Evaluation cycle complete"
        );
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::DuplicatePolicy;
    use crate::constants::{AlertSeverity, ComponentKind};
    use crate::state_machine::{HealthStatus, OperationMode};
    use crate::test_utils::{RecordingAlertSink, ScriptedProbe, ToggleProbe};

    fn orchestrator(
        components: Vec<Component>,
    ) -> (HealthOrchestrator, Arc<RecordingAlertSink>) {
        let sink = Arc::new(RecordingAlertSink::new());
        let orchestrator = HealthOrchestrator::new(
            SentinelConfig::default(),
            Arc::new(ManualClock::default()),
            sink.clone(),
            components,
        )
        .unwrap();
        (orchestrator, sink)
    }

    #[tokio::test]
    async fn test_empty_registry_evaluates_to_defaults() {
        let (orchestrator, sink) = orchestrator(Vec::new());

        let snapshot = orchestrator.evaluate_now().await;
        assert_eq!(snapshot.mode, OperationMode::Complete);
        assert_eq!(snapshot.health, HealthStatus::Optimal);
        assert!(snapshot.history.is_empty());
        assert_eq!(snapshot.cycle, 1);
        assert!(sink.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_core_outage_reaches_emergency() {
        let probe = Arc::new(ToggleProbe::new(false));
        let (orchestrator, sink) = orchestrator(vec![Component::new(
            "db",
            "Database",
            ComponentKind::Core,
            probe.clone(),
        )]);

        assert_eq!(orchestrator.evaluate_now().await.mode, OperationMode::Complete);
        assert_eq!(orchestrator.evaluate_now().await.mode, OperationMode::Critical);
        let snapshot = orchestrator.evaluate_now().await;
        assert_eq!(snapshot.mode, OperationMode::Emergency);
        assert_eq!(snapshot.health, HealthStatus::Critical);
        assert_eq!(snapshot.history.len(), 2);
        assert_eq!(
            sink.severities(),
            vec![AlertSeverity::High, AlertSeverity::Critical]
        );

        probe.set_healthy(true);
        let snapshot = orchestrator.evaluate_now().await;
        assert_eq!(snapshot.mode, OperationMode::Complete);
        assert_eq!(snapshot.history.len(), 3);
        assert_eq!(sink.alerts().len(), 2);
        assert_eq!(probe.calls(), 4);
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected_at_construction() {
        let probe = Arc::new(ToggleProbe::new(true));
        let result = HealthOrchestrator::new(
            SentinelConfig::default(),
            Arc::new(ManualClock::default()),
            Arc::new(RecordingAlertSink::new()),
            vec![
                Component::new("db", "Database", ComponentKind::Core, probe.clone()),
                Component::new("db", "Database", ComponentKind::Core, probe),
            ],
        );
        assert!(matches!(
            result,
            Err(SentinelError::DuplicateComponent { .. })
        ));
    }

    #[tokio::test]
    async fn test_replace_policy_allows_overwrite() {
        let mut config = SentinelConfig::default();
        config.registration.duplicate_policy = DuplicatePolicy::Replace;
        let probe = Arc::new(ToggleProbe::new(true));

        let orchestrator = HealthOrchestrator::new(
            config,
            Arc::new(ManualClock::default()),
            Arc::new(RecordingAlertSink::new()),
            vec![Component::new("db", "Database", ComponentKind::Core, probe.clone())],
        )
        .unwrap();
        orchestrator
            .register(Component::new("db", "Primary DB", ComponentKind::Core, probe))
            .unwrap();

        assert_eq!(
            orchestrator.component_status("db").unwrap().name(),
            "Primary DB"
        );
    }

    #[tokio::test]
    async fn test_component_status_lookup() {
        let (orchestrator, _) = orchestrator(vec![Component::new(
            "api",
            "Payments API",
            ComponentKind::Ramification,
            Arc::new(ScriptedProbe::new([false])),
        )]);

        orchestrator.evaluate_now().await;
        let api = orchestrator.component_status("api").unwrap();
        assert_eq!(api.status(), HealthStatus::Degraded);
        assert_eq!(api.consecutive_failures(), 1);
        assert!(api.last_checked_at().is_some());
        assert!(orchestrator.component_status("missing").is_none());
    }

    #[tokio::test]
    async fn test_start_runs_immediately_and_is_idempotent() {
        let probe = Arc::new(ToggleProbe::new(true));
        let (orchestrator, _) = orchestrator(vec![Component::new(
            "db",
            "Database",
            ComponentKind::Core,
            probe.clone(),
        )]);

        orchestrator.start(Duration::from_secs(3600)).await.unwrap();
        assert!(orchestrator.is_running());
        assert_eq!(orchestrator.cycle_count(), 1);

        orchestrator.start(Duration::from_secs(3600)).await.unwrap();
        assert_eq!(orchestrator.cycle_count(), 1);
        assert_eq!(probe.calls(), 1);

        orchestrator.stop().await;
        orchestrator.stop().await;
        assert_eq!(orchestrator.scheduler_state(), SchedulerState::Stopped);
    }

    #[tokio::test]
    async fn test_report_components_come_from_last_cycle() {
        let (orchestrator, _) = orchestrator(vec![Component::new(
            "db",
            "Database",
            ComponentKind::Core,
            Arc::new(ToggleProbe::new(false)),
        )]);

        orchestrator.evaluate_now().await;
        orchestrator
            .register(Component::new(
                "cache",
                "Cache",
                ComponentKind::Extremity,
                Arc::new(ToggleProbe::new(true)),
            ))
            .unwrap();

        let report = orchestrator.report();
        assert_eq!(report.health, HealthStatus::Degraded);
        let ids: Vec<&str> = report.components.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["db"]);
        assert_eq!(report.components[0].consecutive_failures, 1);

        orchestrator.evaluate_now().await;
        let report = orchestrator.report();
        assert_eq!(report.components.len(), 2);
        assert_eq!(report.components[0].consecutive_failures, 2);
    }

    #[tokio::test]
    async fn test_zero_interval_rejected() {
        let (orchestrator, _) = orchestrator(Vec::new());
        assert!(orchestrator.start(Duration::ZERO).await.is_err());
        assert!(!orchestrator.is_running());
    }
}
