//! Pool engine replay entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::io::BufWriter;
use std::path::PathBuf;
use torq_config::{EngineConfig, LoggingConfig};
use torq_pool_engine::{Scenario, ScenarioRunner};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/engine.toml")]
    config: PathBuf,

    /// Environment override loaded from config/environments/<ENV>.toml
    #[arg(short, long)]
    env: Option<String>,

    /// Scenario JSON to replay
    #[arg(short, long)]
    scenario: PathBuf,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    // stdout carries the report, logs go to stderr
    let json_layer = logging
        .json
        .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!logging.json)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = EngineConfig::load(Some(&args.config), args.env.as_deref())
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;
    init_tracing(&config.logging);

    info!("Starting Torq pool engine replay");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let scenario = Scenario::load(&args.scenario)?;
    let runner = ScenarioRunner::new(&config, &scenario)?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let summary = runner.run(&scenario, &mut out)?;

    let stats = runner.engine().stats();
    info!(
        steps = summary.steps,
        failed = summary.failed,
        events = summary.events,
        total_pools = stats.total_pools,
        active_pools = stats.active_pools,
        "Scenario complete"
    );
    Ok(())
}
