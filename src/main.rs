use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use cpu_queue_sim::{
    Sweep, SweepConfig,
    sim::{self, ReportRow},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const RESULTS_PATH: &str = "results.txt";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SweepConfig::default();
    info!(
        rate_start = config.rate_start,
        rate_end = config.rate_end,
        mean_service_time = config.mean_service_time,
        completions = config.completion_threshold,
        "running FCFS sweep"
    );

    let rows: Vec<ReportRow> = Sweep::new(config)?.run()?;

    let file = File::create(RESULTS_PATH)
        .with_context(|| format!("failed to create {RESULTS_PATH}"))?;
    let mut out = BufWriter::new(file);
    sim::write_table(&rows, &mut out)?;
    out.flush()
        .with_context(|| format!("failed to flush {RESULTS_PATH}"))?;
    info!(path = RESULTS_PATH, rows = rows.len(), "report written");
    Ok(())
}
