use super::event::EventKind;
use super::state::{CpuState, Process, ProcessId, SimCtx, SimTime};

/// What one call to [`Engine::step`](super::driver::Engine::step) did.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub time: SimTime,
    pub kind: EventKind,
    pub process: ProcessId,
    pub from: CpuState,
    pub to: CpuState,
    pub ready_len: usize,
    pub completed: u64,
    // Final record of the departing process, for departures
    pub departed: Option<Process>,
}

/// Cross-checks engine state after every transition.
#[derive(Debug, Default)]
pub struct Observer {
    steps: u64,
    last_time: Option<SimTime>,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn observe(&mut self, ctx: &SimCtx, transition: &Transition, threshold: u64) {
        self.steps += 1;

        if let Some(last) = self.last_time {
            assert!(
                transition.time >= last,
                "Event at {} processed after event at {last}",
                transition.time
            );
        }
        self.last_time = Some(transition.time);

        assert!(
            ctx.stats.completed <= threshold,
            "Completed {} processes, threshold is {threshold}",
            ctx.stats.completed
        );
        assert_eq!(transition.to, ctx.cpu.state());

        if let Some(current) = ctx.cpu.current {
            let process = ctx.process(current);
            debug_assert!(
                process.start_time.is_some(),
                "CPU occupant {current:?} was never dispatched"
            );
            debug_assert!(
                !ctx.ready.contains(current),
                "CPU occupant {current:?} also waiting in the ready queue"
            );
        } else {
            debug_assert!(
                ctx.ready.is_empty(),
                "CPU idle with {} processes ready",
                ctx.ready.len()
            );
        }

        for waiting in ctx.ready.iter() {
            debug_assert!(
                ctx.process(waiting).start_time.is_none(),
                "Ready process {waiting:?} already started"
            );
        }

        if let Some(departed) = &transition.departed {
            let start = departed.start_time.expect("Departed process never started");
            assert!(
                start >= departed.arrival_time,
                "Process started at {start} before arriving at {}",
                departed.arrival_time
            );
            assert_eq!(
                departed.end_time,
                Some(start + departed.service_time),
                "Process finished before receiving its full demand"
            );
            assert_eq!(departed.end_time, Some(transition.time));
        }
    }
}
