#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Sentinel Core
//!
//! System health orchestration core: models an application's internal subsystems and
//! external dependencies as components, probes them periodically, derives a discrete
//! operating mode for the whole system and records every mode transition.
//!
//! ## Architecture
//!
//! The host application supplies the probes (one async boolean check per component) and an
//! alert sink. The core decides when a component is degraded, which operating mode the
//! system is in, and whether a transition warrants an alert; it never decides how probes
//! work or how alerts are delivered.
//!
//! ## Module Organization
//!
//! - [`models`] - Components, snapshots, adaptation events and reports
//! - [`state_machine`] - Health status, operation mode and scheduler states
//! - [`orchestration`] - Registry, probe executor, aggregator, adaptation log, scheduler
//! - [`events`] - Alert sinks and the adaptation event publisher
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//! - [`clock`] - Wall-clock abstraction
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sentinel_core::clock::SystemClock;
//! use sentinel_core::config::SentinelConfig;
//! use sentinel_core::constants::ComponentKind;
//! use sentinel_core::events::TracingAlertSink;
//! use sentinel_core::models::Component;
//! use sentinel_core::orchestration::{FnProbe, HealthOrchestrator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let database = Component::new(
//!     "database",
//!     "Primary database",
//!     ComponentKind::Core,
//!     Arc::new(FnProbe::new("database", || true)),
//! );
//!
//! let orchestrator = HealthOrchestrator::new(
//!     SentinelConfig::default(),
//!     Arc::new(SystemClock),
//!     Arc::new(TracingAlertSink),
//!     vec![database],
//! )?;
//!
//! let snapshot = orchestrator.evaluate_now().await;
//! println!("mode: {}, health: {}", snapshot.mode, snapshot.health);
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod state_machine;
pub mod test_utils;

pub use config::{DuplicatePolicy, MonitorConfig, SentinelConfig};
pub use constants::{AlertSeverity, ComponentKind};
pub use error::{AlertError, ProbeError, Result, SentinelError};
pub use models::{AdaptationEvent, Component, SystemReport, SystemSnapshot};
pub use orchestration::{HealthOrchestrator, HealthProbe};
pub use state_machine::{HealthStatus, OperationMode, SchedulerState};
