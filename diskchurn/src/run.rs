use anyhow::Context as _;
use std::sync::Arc;

use diskchurn_core::runner::StressConfig;
use diskchurn_core::{Platform, SystemPlatform};

use crate::cli::Cli;
use crate::output;
use crate::run_error::RunError;
use crate::shutdown;

pub async fn run(cli: Cli) -> Result<(), RunError> {
    let out = output::formatter(cli.output);
    let cfg = stress_config(&cli)?;
    let platform: Arc<dyn Platform> = Arc::new(SystemPlatform);

    out.print_header(&cfg);

    let outcome =
        diskchurn_core::runner::run(cfg, platform, shutdown::stop_signal(cli.duration)).await?;

    tracing::info!(results = %outcome.totals, "good bye");

    out.print_summary(&outcome)
        .context("failed to print summary")
        .map_err(RunError::RuntimeError)
}

fn stress_config(cli: &Cli) -> Result<StressConfig, RunError> {
    let base = match &cli.path {
        Some(path) => StressConfig::new(path),
        None => StressConfig::from_current_dir()?,
    };

    Ok(StressConfig {
        min_mb: cli.min,
        max_mb: cli.max,
        workers: cli.workers,
        chunk_size: cli.chunk_size,
        pause: cli.pause_min..cli.pause_max,
        seed: cli.seed,
        drop_caches: cli.drop_caches,
        ..base
    })
}
