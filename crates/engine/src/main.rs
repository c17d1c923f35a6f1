// crates/engine/src/main.rs
use anyhow::Context;
use clap::Parser;
use engine::*;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(about = "Scores lending wallets from Aave transaction history", long_about = None)]
struct Cli {
    /// Transaction export (.json, JSON lines, or .zip)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Credit score CSV
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Engine config (defaults to config/engine.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the score distribution as JSON
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Write Prometheus metrics text at the end of the run
    #[arg(long)]
    metrics: Option<PathBuf>,

    #[arg(long, env = "CREDIT_ENGINE_LOG_JSON")]
    log_json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("credit-engine: {}", e);
            return ExitCode::FAILURE;
        }
    };
    apply_overrides(&mut config, &cli);

    init_logging(&config.logging);

    let prometheus = match cli.metrics.as_ref().map(|_| install_metrics()).transpose() {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = run(&config);

    if let (Some(handle), Some(path)) = (prometheus, cli.metrics.as_ref()) {
        if let Err(e) = std::fs::write(path, handle.render()) {
            tracing::warn!("Failed to write metrics to {}: {}", path.display(), e);
        }
    }

    match outcome {
        Ok(report) => {
            tracing::info!(
                "Scored {} wallets ({} records, {} dropped)",
                report.summary.wallets,
                report.records,
                report.dropped
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &EngineConfig) -> anyhow::Result<RunReport> {
    tracing::info!(
        "Credit engine starting: {} -> {}",
        config.io.input.display(),
        config.io.output.display()
    );

    let pipeline = CreditPipeline::new(config.pipeline)?;
    let report = pipeline
        .run(&config.io)
        .with_context(|| format!("scoring {} failed", config.io.input.display()))?;

    Ok(report)
}

fn apply_overrides(config: &mut EngineConfig, cli: &Cli) {
    if let Some(input) = &cli.input {
        config.io.input = input.clone();
    }
    if let Some(output) = &cli.output {
        config.io.output = output.clone();
    }
    if cli.summary.is_some() {
        config.io.summary = cli.summary.clone();
    }
    if cli.log_json {
        config.logging.json = true;
    }
}

fn init_logging(logging: &LoggingSection) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

fn install_metrics() -> anyhow::Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")
}
