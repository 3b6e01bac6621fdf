//! # Sentinel Demo Host
//!
//! Small host application around the sentinel core: registers a handful of simulated
//! components, runs a number of evaluation cycles and prints the resulting report as JSON.
//! One simulated external dependency fails permanently so the mode transition and alerting
//! paths are visible in the output.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sentinel_core::clock::SystemClock;
use sentinel_core::config::ConfigLoader;
use sentinel_core::constants::ComponentKind;
use sentinel_core::events::ChannelAlertSink;
use sentinel_core::logging::init_structured_logging;
use sentinel_core::models::Component;
use sentinel_core::orchestration::{AsyncFnProbe, FnProbe, HealthOrchestrator};
use sentinel_core::test_utils::ScriptedProbe;
use sentinel_core::ProbeError;

#[derive(Parser)]
#[command(name = "sentinel-demo")]
#[command(about = "Run the sentinel health orchestrator against simulated components")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Number of evaluation cycles to run before printing the report
    #[arg(short, long, default_value_t = 4)]
    cycles: u32,

    /// Interval between cycles in milliseconds (overrides configuration)
    #[arg(short, long)]
    interval_ms: Option<u64>,

    /// Configuration directory
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,
}

fn demo_components() -> Vec<Component> {
    vec![
        Component::new(
            "database",
            "Primary database",
            ComponentKind::Core,
            Arc::new(FnProbe::new("database", || true)),
        ),
        Component::new(
            "orders",
            "Order processing",
            ComponentKind::Hemisphere,
            Arc::new(ScriptedProbe::new([true, false, true])),
        )
        .essential(true)
        .depends_on(["database"]),
        Component::new(
            "exports",
            "Report exports",
            ComponentKind::Extremity,
            Arc::new(FnProbe::new("exports", || true)),
        )
        .depends_on(["database", "file-storage"]),
        Component::new(
            "payments-api",
            "Payments provider",
            ComponentKind::Ramification,
            Arc::new(AsyncFnProbe::new("payments-api", || async {
                Err(ProbeError::failed("credentials not configured"))
            })),
        ),
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::load_from_directory(
        &cli.config_dir,
        &ConfigLoader::detect_environment(),
    )
    .context("loading sentinel configuration")?;
    if let Some(interval_ms) = cli.interval_ms {
        config.monitor.evaluation_interval_ms = interval_ms;
    }
    config.logging.json |= cli.json_logs;
    init_structured_logging(&config.logging);

    let interval = Duration::from_millis(config.monitor.evaluation_interval_ms);
    let (alert_sink, mut alerts) = ChannelAlertSink::new();
    let orchestrator = HealthOrchestrator::new(
        config,
        Arc::new(SystemClock),
        Arc::new(alert_sink),
        demo_components(),
    )
    .context("building health orchestrator")?;

    let alert_printer = tokio::spawn(async move {
        while let Some(alert) = alerts.recv().await {
            eprintln!("[{}] {}", alert.severity, alert.message);
        }
    });

    orchestrator.start(interval).await?;
    while orchestrator.cycle_count() < u64::from(cli.cycles) {
        tokio::time::sleep(interval / 4).await;
    }
    orchestrator.stop().await;

    println!("{}", orchestrator.report().to_json()?);

    drop(orchestrator);
    alert_printer.await?;
    Ok(())
}
