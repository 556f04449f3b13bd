use super::variate::VariateSource;
use crate::core::state::{Process, SimTime};

/// Turns variates into processes. Does not touch engine state; the caller
/// files the process and schedules its arrival.
#[derive(Debug, Clone)]
pub struct ProcessFactory<V: VariateSource> {
    source: V,
}

impl<V: VariateSource> ProcessFactory<V> {
    pub fn new(source: V) -> Self {
        Self { source }
    }

    pub fn create_process(
        &mut self,
        clock: SimTime,
        arrival_rate: f64,
        mean_service_time: f64,
    ) -> Process {
        let arrival_time = clock + self.source.interarrival_gap(arrival_rate);
        let service_time = self.source.service_demand(mean_service_time);
        Process::new(arrival_time, service_time)
    }

    pub fn source(&self) -> &V {
        &self.source
    }
}
