//! # Structured Logging Module
//!
//! Environment-aware structured logging for the sentinel core, plus helpers that emit the
//! canonical records for probe outcomes and mode transitions.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;
use crate::constants::ComponentKind;
use crate::state_machine::{HealthStatus, OperationMode};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
pub fn init_structured_logging(config: &LoggingConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = build_filter(config, &environment);

        let console_layer = if config.json {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .json()
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true)
                .boxed()
        };

        // Use try_init to avoid panic if global subscriber already set
        if tracing_subscriber::registry()
            .with(console_layer.with_filter(filter))
            .try_init()
            .is_err()
        {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            environment = %environment,
            json = config.json,
            "STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("SENTINEL_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

fn build_filter(config: &LoggingConfig, environment: &str) -> EnvFilter {
    if let Some(level) = &config.level {
        return EnvFilter::new(level);
    }
    EnvFilter::try_from_env("SENTINEL_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(get_log_level(environment)))
}

/// Log the outcome of one probe invocation
pub fn log_probe_outcome(
    component_id: &str,
    kind: ComponentKind,
    status: HealthStatus,
    consecutive_failures: u32,
    error: Option<&str>,
) {
    match error {
        Some(error) => tracing::warn!(
            component_id = %component_id,
            kind = %kind,
            status = %status,
            consecutive_failures = consecutive_failures,
            error = %error,
            "PROBE_FAILED"
        ),
        None => tracing::debug!(
            component_id = %component_id,
            kind = %kind,
            status = %status,
            consecutive_failures = consecutive_failures,
            "PROBE_OK"
        ),
    }
}

/// Log a system mode transition; degradations at warn, recoveries at info
pub fn log_mode_transition(from_mode: OperationMode, to_mode: OperationMode, trigger: &str) {
    if to_mode > from_mode {
        tracing::warn!(
            from_mode = %from_mode,
            to_mode = %to_mode,
            trigger = %trigger,
            "MODE_TRANSITION: system degraded"
        );
    } else {
        tracing::info!(
            from_mode = %from_mode,
            to_mode = %to_mode,
            trigger = %trigger,
            "MODE_TRANSITION: system recovered"
        );
    }
}
