use serde::{Deserialize, Serialize};

use super::state::{RunStats, SimTime};

/// Counters of a finished run, snapshotted before the engine resets.
///
/// Derived metrics (average turnaround, throughput, utilization, average
/// ready-queue depth) are left to the reader; see [`crate::sim::Metrics`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub completed_count: u64,
    pub cumulative_turnaround_time: SimTime,
    pub cumulative_service_time: SimTime,
    pub cumulative_ready_queue_samples: u64,
    pub final_clock: SimTime,
}

impl RunSummary {
    pub fn snapshot(stats: &RunStats, final_clock: SimTime) -> Self {
        Self {
            completed_count: stats.completed,
            cumulative_turnaround_time: stats.cumulative_turnaround_time,
            cumulative_service_time: stats.cumulative_service_time,
            cumulative_ready_queue_samples: stats.cumulative_ready_queue_samples,
            final_clock,
        }
    }
}
