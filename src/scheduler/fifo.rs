use super::{ProcessId, ProcessTable, ReadyQueue, Scheduler};

#[derive(Debug, Default, Clone, Copy)]
pub struct FcfsScheduler;

impl Scheduler for FcfsScheduler {
    fn select_next(
        &mut self,
        ready: &mut ReadyQueue,
        _processes: &ProcessTable,
    ) -> Option<ProcessId> {
        ready.pop_front()
    }

    fn name(&self) -> &'static str {
        "FCFS"
    }
}
