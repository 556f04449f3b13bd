pub mod core;
pub mod scheduler;
pub mod sim;
pub mod workload;

pub use crate::core::{ConfigError, Engine, EngineConfig, RunSummary, Transition};
pub use scheduler::{FcfsScheduler, Scheduler};
pub use sim::{Sweep, SweepConfig};
pub use workload::{ExponentialVariates, TraceVariates, VariateSource};
