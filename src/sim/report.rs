use std::io::Write;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::RunSummary;

/// Derived performance figures of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub avg_turnaround_time: f64,
    pub throughput: f64,
    pub utilization: f64,
    pub avg_ready_queue_len: f64,
}

impl Metrics {
    pub fn from_summary(summary: &RunSummary) -> Self {
        let completed = summary.completed_count as f64;
        Self {
            avg_turnaround_time: ratio(summary.cumulative_turnaround_time, completed),
            throughput: ratio(completed, summary.final_clock),
            utilization: ratio(summary.cumulative_service_time, summary.final_clock),
            avg_ready_queue_len: ratio(summary.cumulative_ready_queue_samples as f64, completed),
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// One line of the sweep report: a rate and the metrics averaged over its
/// replications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub arrival_rate: f64,
    pub replications: usize,
    pub mean: Metrics,
    /// Standard error of each mean; zero with a single replication.
    pub std_error: Metrics,
}

pub const TABLE_HEADER: &str = "Lambda\tTurnaround Time\t Throughput\t CPU Util\t   Avg#ProcReadyQ";

pub fn write_table<W: Write>(rows: &[ReportRow], mut out: W) -> Result<()> {
    writeln!(out, "{TABLE_HEADER}").context("failed to write report header")?;
    writeln!(out, "{}", "-".repeat(62)).context("failed to write report header")?;
    for row in rows {
        writeln!(
            out,
            "{:>6}\t{:>17.3}\t{:>10.3}\t{:>8.3}\t{:>14.3}",
            row.arrival_rate,
            row.mean.avg_turnaround_time,
            row.mean.throughput,
            row.mean.utilization,
            row.mean.avg_ready_queue_len,
        )
        .with_context(|| format!("failed to write report row for rate {}", row.arrival_rate))?;
    }
    Ok(())
}
