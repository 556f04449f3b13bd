pub mod fifo;

use crate::core::state::{ProcessId, ProcessTable, ReadyQueue};
pub use fifo::FcfsScheduler;

/// Dispatch policy. The engine owns arrival, departure and CPU bookkeeping;
/// a discipline only decides which waiting process runs next.
pub trait Scheduler {
    /// Remove and return the process to dispatch, or `None` to leave the CPU
    /// idle. Called on every departure.
    fn select_next(&mut self, ready: &mut ReadyQueue, processes: &ProcessTable)
    -> Option<ProcessId>;

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
