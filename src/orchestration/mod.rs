//! # Health Orchestration Engine
//!
//! Registry, probe execution, aggregation, adaptation log and the scheduler that ties them
//! into periodic evaluation cycles.
//!
//! ## Core Components
//!
//! - **ComponentRegistry**: Monitored components keyed by id
//! - **ProbeExecutor**: Isolated, bounded probe invocation and failure escalation
//! - **health_aggregator**: Pure mode and overall-health derivation
//! - **AdaptationLog**: Transition detection, bounded history and alerting
//! - **HealthOrchestrator**: Scheduler and public control surface

pub mod adaptation_log;
pub mod health_aggregator;
pub mod probe;
pub mod probe_executor;
pub mod registry;
pub mod scheduler;

// Re-export core types and components for easy access
pub use adaptation_log::AdaptationLog;
pub use health_aggregator::{compute_mode, compute_overall_health};
pub use probe::{AsyncFnProbe, FnProbe, HealthProbe};
pub use probe_executor::{ProbeExecutor, ProbeOutcome};
pub use registry::ComponentRegistry;
pub use scheduler::HealthOrchestrator;
