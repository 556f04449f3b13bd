use anyhow::{Result, ensure};
use average::{Estimate, MeanWithError};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::report::{Metrics, ReportRow};
use crate::core::{Engine, EngineConfig, RunSummary};

/// Upper bound on the number of rates in one sweep.
pub const MAX_RATES: usize = 100_000;

/// Arrival-rate sweep, one independent engine per (rate, replication).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub rate_start: f64,
    pub rate_end: f64,
    pub rate_step: f64,
    pub mean_service_time: f64,
    pub completion_threshold: u64,
    pub replications: usize,
    pub seed: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            rate_start: 10.0,
            rate_end: 30.0,
            rate_step: 1.0,
            mean_service_time: 0.04,
            completion_threshold: 10_000,
            replications: 1,
            seed: 0,
        }
    }
}

pub struct Sweep {
    config: SweepConfig,
}

impl Sweep {
    pub fn new(config: SweepConfig) -> Result<Self> {
        ensure!(
            config.rate_step > 0.0 && config.rate_step.is_finite(),
            "rate step must be positive, got {}",
            config.rate_step
        );
        ensure!(
            config.rate_start.is_finite() && config.rate_end.is_finite(),
            "rate range {}..={} must be finite",
            config.rate_start,
            config.rate_end
        );
        ensure!(
            config.rate_start <= config.rate_end,
            "empty rate range {}..={}",
            config.rate_start,
            config.rate_end
        );
        ensure!(
            rate_span(&config) < MAX_RATES as f64,
            "rate range {}..={} step {} exceeds {MAX_RATES} rates",
            config.rate_start,
            config.rate_end,
            config.rate_step
        );
        ensure!(config.replications > 0, "need at least one replication");
        // Surface engine config errors before any run starts
        for rate in rates(&config) {
            EngineConfig::new(rate, config.mean_service_time, config.completion_threshold)?;
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn rates(&self) -> Vec<f64> {
        rates(&self.config)
    }

    pub fn run(&self) -> Result<Vec<ReportRow>> {
        let mut rows = Vec::new();
        for (rate_index, rate) in self.rates().into_iter().enumerate() {
            let summaries = self.run_rate(rate_index, rate)?;
            let row = self.summarize(rate, &summaries);
            info!(
                arrival_rate = rate,
                avg_turnaround = row.mean.avg_turnaround_time,
                throughput = row.mean.throughput,
                utilization = row.mean.utilization,
                avg_ready_queue = row.mean.avg_ready_queue_len,
                "rate finished"
            );
            rows.push(row);
        }
        Ok(rows)
    }

    fn run_rate(&self, rate_index: usize, rate: f64) -> Result<Vec<RunSummary>> {
        let config = EngineConfig::new(
            rate,
            self.config.mean_service_time,
            self.config.completion_threshold,
        )?;
        (0..self.config.replications)
            .map(|replication| -> Result<RunSummary> {
                let seed = replication_seed(self.config.seed, rate_index, replication);
                let mut engine = Engine::fcfs(config, seed)?;
                Ok(engine.run())
            })
            .collect()
    }

    fn summarize(&self, rate: f64, summaries: &[RunSummary]) -> ReportRow {
        let mut turnaround = MeanWithError::new();
        let mut throughput = MeanWithError::new();
        let mut utilization = MeanWithError::new();
        let mut ready = MeanWithError::new();
        for summary in summaries {
            let metrics = Metrics::from_summary(summary);
            turnaround.add(metrics.avg_turnaround_time);
            throughput.add(metrics.throughput);
            utilization.add(metrics.utilization);
            ready.add(metrics.avg_ready_queue_len);
        }

        let error = |m: &MeanWithError| {
            if summaries.len() > 1 { m.error() } else { 0.0 }
        };
        ReportRow {
            arrival_rate: rate,
            replications: summaries.len(),
            mean: Metrics {
                avg_turnaround_time: turnaround.mean(),
                throughput: throughput.mean(),
                utilization: utilization.mean(),
                avg_ready_queue_len: ready.mean(),
            },
            std_error: Metrics {
                avg_turnaround_time: error(&turnaround),
                throughput: error(&throughput),
                utilization: error(&utilization),
                avg_ready_queue_len: error(&ready),
            },
        }
    }
}

// Index of the last rate; tolerates rounding so the endpoint is kept
fn rate_span(config: &SweepConfig) -> f64 {
    ((config.rate_end - config.rate_start) / config.rate_step + 1e-9).floor()
}

fn rates(config: &SweepConfig) -> Vec<f64> {
    // Multiply rather than accumulate so the last rate is not lost to rounding
    (0..=rate_span(config) as usize)
        .map(|i| config.rate_start + i as f64 * config.rate_step)
        .collect()
}

fn replication_seed(base: u64, rate_index: usize, replication: usize) -> u64 {
    base.wrapping_add(((rate_index as u64) << 32) | replication as u64)
        .wrapping_mul(0x9e37_79b9_7f4a_7c15)
}
