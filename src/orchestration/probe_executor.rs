//! # Probe Executor
//!
//! Runs one component's probe and folds the result into the component's transient health.
//! Every probe invocation runs in its own tokio task, so a panicking probe surfaces as a
//! failure instead of tearing down the evaluation cycle, and is raced against the configured
//! timeout. Nothing that happens inside a probe escapes [`ProbeExecutor::check`].

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinError;

use crate::clock::Clock;
use crate::error::{panic_message, ProbeError};
use crate::logging::log_probe_outcome;
use crate::models::Component;

/// Result of a single probe invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Healthy,
    /// The probe answered, and the answer was "unhealthy"
    Unhealthy,
    /// The probe failed, panicked or timed out
    Errored(ProbeError),
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Healthy)
    }
}

#[derive(Debug, Clone)]
pub struct ProbeExecutor {
    clock: Arc<dyn Clock>,
    timeout: Option<Duration>,
}

impl ProbeExecutor {
    pub fn new(clock: Arc<dyn Clock>, timeout: Option<Duration>) -> Self {
        Self { clock, timeout }
    }

    /// Probe `component` and update its status, failure count and check time
    pub async fn check(&self, component: &mut Component) -> ProbeOutcome {
        let started = Instant::now();
        let outcome = self.invoke(component).await;
        let checked_at = self.clock.now();

        match &outcome {
            ProbeOutcome::Healthy => component.record_success(checked_at),
            ProbeOutcome::Unhealthy | ProbeOutcome::Errored(_) => {
                component.record_failure(checked_at)
            }
        }

        let error = match &outcome {
            ProbeOutcome::Healthy => None,
            ProbeOutcome::Unhealthy => Some("probe reported unhealthy".to_string()),
            ProbeOutcome::Errored(err) => Some(err.to_string()),
        };
        log_probe_outcome(
            component.id(),
            component.kind(),
            component.status(),
            component.consecutive_failures(),
            error.as_deref(),
        );
        tracing::trace!(
            component_id = %component.id(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Probe finished"
        );

        outcome
    }

    async fn invoke(&self, component: &Component) -> ProbeOutcome {
        let probe = component.probe();
        let mut handle = tokio::spawn(async move { probe.check().await });

        let joined = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, &mut handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    handle.abort();
                    return ProbeOutcome::Errored(ProbeError::TimedOut {
                        timeout_ms: limit.as_millis() as u64,
                    });
                }
            },
            None => handle.await,
        };

        match joined {
            Ok(Ok(true)) => ProbeOutcome::Healthy,
            Ok(Ok(false)) => ProbeOutcome::Unhealthy,
            Ok(Err(err)) => ProbeOutcome::Errored(err),
            Err(join_error) => ProbeOutcome::Errored(Self::join_failure(join_error)),
        }
    }

    fn join_failure(join_error: JoinError) -> ProbeError {
        if join_error.is_panic() {
            ProbeError::Panicked(panic_message(join_error.into_panic()))
        } else {
            ProbeError::Failed("probe task was cancelled".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::constants::ComponentKind;
    use crate::orchestration::probe::{AsyncFnProbe, FnProbe, HealthProbe};
    use crate::state_machine::HealthStatus;
    use crate::test_utils::ScriptedProbe;

    fn executor(timeout: Option<Duration>) -> (ProbeExecutor, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        (ProbeExecutor::new(clock.clone(), timeout), clock)
    }

    fn component(probe: Arc<dyn HealthProbe>) -> Component {
        Component::new("svc", "Service", ComponentKind::Extremity, probe)
    }

    #[tokio::test]
    async fn test_success_resets_state() {
        let (executor, clock) = executor(None);
        let mut c = component(Arc::new(ScriptedProbe::new([false, false, true])));

        executor.check(&mut c).await;
        executor.check(&mut c).await;
        assert_eq!(c.status(), HealthStatus::Critical);

        clock.advance(chrono::Duration::seconds(5));
        let outcome = executor.check(&mut c).await;
        assert!(outcome.is_success());
        assert_eq!(c.status(), HealthStatus::Optimal);
        assert_eq!(c.consecutive_failures(), 0);
        assert_eq!(c.last_checked_at(), Some(clock.now()));
    }

    #[tokio::test]
    async fn test_error_counts_as_failure() {
        let (executor, _) = executor(None);
        let mut c = component(Arc::new(AsyncFnProbe::new("err", || async {
            Err(ProbeError::failed("credentials missing"))
        })));

        let outcome = executor.check(&mut c).await;
        assert_eq!(
            outcome,
            ProbeOutcome::Errored(ProbeError::Failed("credentials missing".to_string()))
        );
        assert_eq!(c.status(), HealthStatus::Degraded);
        assert!(c.last_checked_at().is_some());
    }

    #[tokio::test]
    async fn test_panicking_probe_is_contained() {
        let (executor, _) = executor(None);
        let mut c = component(Arc::new(FnProbe::new("panics", || panic!("probe exploded"))));

        let outcome = executor.check(&mut c).await;
        assert_eq!(
            outcome,
            ProbeOutcome::Errored(ProbeError::Panicked("probe exploded".to_string()))
        );
        assert_eq!(c.consecutive_failures(), 1);
    }

    #[tokio::test]
    async fn test_timeout_counts_as_failure() {
        let (executor, _) = executor(Some(Duration::from_millis(20)));
        let mut c = component(Arc::new(AsyncFnProbe::new("hangs", || async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(true)
        })));

        let outcome = executor.check(&mut c).await;
        assert_eq!(
            outcome,
            ProbeOutcome::Errored(ProbeError::TimedOut { timeout_ms: 20 })
        );
        assert_eq!(c.status(), HealthStatus::Degraded);
    }

    #[tokio::test]
    async fn test_blocking_closure_respects_timeout() {
        let (executor, _) = executor(Some(Duration::from_millis(50)));
        let mut c = component(Arc::new(FnProbe::new("stuck", || {
            std::thread::sleep(Duration::from_millis(800));
            true
        })));

        let started = Instant::now();
        let outcome = executor.check(&mut c).await;

        assert!(started.elapsed() < Duration::from_millis(500));
        assert_eq!(
            outcome,
            ProbeOutcome::Errored(ProbeError::TimedOut { timeout_ms: 50 })
        );
        assert_eq!(c.status(), HealthStatus::Degraded);
    }

    #[tokio::test]
    async fn test_unhealthy_answer_escalates_to_offline() {
        let (executor, _) = executor(None);
        let mut c = component(Arc::new(FnProbe::new("down", || false)));

        for _ in 0..3 {
            assert_eq!(executor.check(&mut c).await, ProbeOutcome::Unhealthy);
        }
        assert_eq!(c.status(), HealthStatus::Offline);
    }
}
