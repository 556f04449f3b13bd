pub mod factory;
pub mod variate;

pub use factory::ProcessFactory;
pub use variate::{ExponentialVariates, TraceVariates, VariateSource, exponential};
