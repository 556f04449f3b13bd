pub mod config;
pub mod driver;
pub mod event;
pub mod observer;
pub mod state;
pub mod summary;

pub use config::{ConfigError, EngineConfig};
pub use driver::Engine;
pub use event::{EmptyQueueError, Event, EventKind, EventQueue};
pub use observer::{Observer, Transition};
pub use state::{
    Cpu, CpuState, Process, ProcessId, ProcessTable, ReadyQueue, RunStats, SimCtx, SimTime,
};
pub use summary::RunSummary;
