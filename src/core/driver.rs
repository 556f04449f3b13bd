use rand::rngs::StdRng;
use tracing::{debug, trace};

use super::{
    config::{ConfigError, EngineConfig},
    event::{EventKind, EventQueue},
    observer::{Observer, Transition},
    state::{Process, ProcessId, SimCtx, SimTime},
    summary::RunSummary,
};
use crate::{
    scheduler::{FcfsScheduler, Scheduler},
    workload::{ExponentialVariates, ProcessFactory, VariateSource},
};

/// Single-CPU discrete-event engine.
///
/// A run starts idle at time zero with one arrival pending and ends once
/// `completion_threshold` processes have departed. Every processed arrival
/// schedules the next one, so the workload is open.
pub struct Engine<S: Scheduler, V: VariateSource> {
    ctx: SimCtx,
    scheduler: S,
    factory: ProcessFactory<V>,
    events: EventQueue,
    config: EngineConfig,
    observer: Observer,
    in_progress: bool,
}

impl Engine<FcfsScheduler, ExponentialVariates<StdRng>> {
    pub fn fcfs(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(FcfsScheduler, config, ExponentialVariates::seeded(seed))
    }
}

impl<S: Scheduler, V: VariateSource> Engine<S, V> {
    pub fn new(scheduler: S, config: EngineConfig, source: V) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            ctx: SimCtx::new(),
            scheduler,
            factory: ProcessFactory::new(source),
            events: EventQueue::new(),
            config,
            observer: Observer::new(),
            in_progress: false,
        })
    }

    /// Run to the completion threshold and return the run's counters.
    ///
    /// Calling `run` again starts a fresh run on a cleared clock and queues;
    /// the variate source carries on from where it stopped.
    pub fn run(&mut self) -> RunSummary {
        while self.step().is_some() {}
        self.finish_run()
    }

    /// Process the earliest pending event. Returns `None` once the completion
    /// threshold has been reached.
    pub fn step(&mut self) -> Option<Transition> {
        if !self.in_progress {
            self.begin_run();
        }
        if self.ctx.stats.completed >= self.config.completion_threshold {
            return None;
        }

        let event = self
            .events
            .pop_earliest()
            .expect("Event queue drained before the completion threshold was reached");

        let from = self.ctx.cpu.state();
        self.ctx.advance_to(event.time);

        let departed = match event.kind {
            EventKind::Arrival => {
                self.handle_arrival(event.process);
                None
            }
            EventKind::Departure => Some(self.handle_departure(event.process)),
        };

        let transition = Transition {
            time: event.time,
            kind: event.kind,
            process: event.process,
            from,
            to: self.ctx.cpu.state(),
            ready_len: self.ctx.ready.len(),
            completed: self.ctx.stats.completed,
            departed,
        };
        trace!(
            time = transition.time,
            kind = ?transition.kind,
            from = ?transition.from,
            to = ?transition.to,
            ready = transition.ready_len,
            completed = transition.completed,
            "transition"
        );

        self.observer
            .observe(&self.ctx, &transition, self.config.completion_threshold);
        Some(transition)
    }

    fn begin_run(&mut self) {
        self.ctx.reset();
        self.events.clear();
        self.observer.reset();
        self.in_progress = true;

        debug!(
            scheduler = self.scheduler.name(),
            arrival_rate = self.config.arrival_rate,
            mean_service_time = self.config.mean_service_time,
            threshold = self.config.completion_threshold,
            "starting run"
        );
        self.schedule_next_arrival();
    }

    // Snapshot first, then clear for reuse. Cumulative counters stay readable
    // through `Engine::ctx().stats` until the next run begins.
    fn finish_run(&mut self) -> RunSummary {
        let summary = RunSummary::snapshot(&self.ctx.stats, self.ctx.now());

        self.events.clear();
        self.ctx.ready.clear();
        self.ctx.processes.clear();
        self.ctx.cpu.current = None;
        self.ctx.stats.completed = 0;
        self.in_progress = false;

        debug!(
            completed = summary.completed_count,
            final_clock = summary.final_clock,
            events = self.observer.steps(),
            "run finished"
        );
        summary
    }

    fn handle_arrival(&mut self, process: ProcessId) {
        if self.ctx.cpu.is_busy() {
            self.ctx.ready.push_back(process);
        } else {
            self.dispatch(process);
        }
        self.schedule_next_arrival();
    }

    fn handle_departure(&mut self, process: ProcessId) -> Process {
        let now = self.ctx.now();
        let done = self.ctx.complete(process);
        self.ctx
            .stats
            .record_departure(&done, now, self.ctx.ready.len());

        if let Some(next) = self
            .scheduler
            .select_next(&mut self.ctx.ready, &self.ctx.processes)
        {
            self.dispatch(next);
        }
        done
    }

    fn dispatch(&mut self, process: ProcessId) {
        let end = self.ctx.dispatch(process);
        self.events.insert(end, EventKind::Departure, process);
    }

    fn schedule_next_arrival(&mut self) {
        let process = self.factory.create_process(
            self.ctx.now(),
            self.config.arrival_rate,
            self.config.mean_service_time,
        );
        let arrival_time = process.arrival_time;
        let id = self.ctx.create_process(process);
        self.events.insert(arrival_time, EventKind::Arrival, id);
    }

    /// Read-only view of CPU, ready queue, process table and running totals.
    /// All mutation goes through `step`/`run` so the observer sees it.
    pub fn ctx(&self) -> &SimCtx {
        &self.ctx
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn clock(&self) -> SimTime {
        self.ctx.now()
    }

    pub fn completed(&self) -> u64 {
        self.ctx.stats.completed
    }

    pub fn ready_len(&self) -> usize {
        self.ctx.ready.len()
    }

    pub fn is_busy(&self) -> bool {
        self.ctx.cpu.is_busy()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::CpuState;
    use crate::workload::TraceVariates;

    fn traced(
        gaps: Vec<f64>,
        services: Vec<f64>,
        threshold: u64,
    ) -> Engine<FcfsScheduler, TraceVariates> {
        let config = EngineConfig::new(1.0, 1.0, threshold).unwrap();
        Engine::new(FcfsScheduler, config, TraceVariates::new(gaps, services)).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let config = EngineConfig {
            arrival_rate: 0.0,
            mean_service_time: 0.04,
            completion_threshold: 10,
        };
        assert!(matches!(
            Engine::fcfs(config, 0),
            Err(ConfigError::NonPositiveArrivalRate(_))
        ));
    }

    #[test]
    fn first_step_seeds_and_processes_first_arrival() {
        let mut engine = traced(vec![5.0, 100.0], vec![3.0], 1);
        assert_eq!(engine.pending_events(), 0);

        let first = engine.step().unwrap();
        assert_eq!(first.kind, EventKind::Arrival);
        assert_eq!(first.time, 5.0);
        assert_eq!((first.from, first.to), (CpuState::Idle, CpuState::Busy));
        // Its departure plus the next synthetic arrival
        assert_eq!(engine.pending_events(), 2);

        let second = engine.step().unwrap();
        assert_eq!(second.kind, EventKind::Departure);
        assert_eq!(second.time, 8.0);
        assert_eq!(second.departed.as_ref().unwrap().service_time, 3.0);
        assert_eq!(engine.step(), None);
    }

    #[test]
    fn arrival_while_busy_waits() {
        let mut engine = traced(vec![0.0, 1.0, 100.0], vec![5.0], 2);

        engine.step().unwrap();
        let queued = engine.step().unwrap();
        assert_eq!(queued.kind, EventKind::Arrival);
        assert_eq!((queued.from, queued.to), (CpuState::Busy, CpuState::Busy));
        assert_eq!(queued.ready_len, 1);
        assert!(engine.ctx().ready.contains(queued.process));
        assert_eq!(engine.ctx().process(queued.process).start_time, None);
    }

    #[test]
    fn finish_resets_counts_but_keeps_totals_until_next_run() {
        let mut engine = traced(vec![5.0, 100.0], vec![3.0], 1);
        let summary = engine.run();

        assert_eq!(summary.completed_count, 1);
        assert_eq!(engine.completed(), 0);
        assert_eq!(engine.pending_events(), 0);
        assert!(!engine.is_busy());
        assert_eq!(engine.ctx().stats.cumulative_turnaround_time, 3.0);
    }

    #[test]
    fn scheduler_name_is_reported() {
        let engine = traced(vec![1.0], vec![1.0], 1);
        assert_eq!(engine.scheduler().name(), "FCFS");
    }
}
