use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("arrival rate must be a positive finite number, got {0}")]
    NonPositiveArrivalRate(f64),
    #[error("mean service time must be a positive finite number, got {0}")]
    NonPositiveMeanServiceTime(f64),
    #[error("completion threshold must be at least 1")]
    ZeroCompletionThreshold,
}

/// Parameters of one simulated run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Mean arrivals per unit of simulated time (lambda).
    pub arrival_rate: f64,
    /// Mean CPU demand of a process.
    pub mean_service_time: f64,
    /// Number of departures after which the run stops.
    pub completion_threshold: u64,
}

impl EngineConfig {
    pub fn new(
        arrival_rate: f64,
        mean_service_time: f64,
        completion_threshold: u64,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            arrival_rate,
            mean_service_time,
            completion_threshold,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.arrival_rate > 0.0 && self.arrival_rate.is_finite()) {
            return Err(ConfigError::NonPositiveArrivalRate(self.arrival_rate));
        }
        // The service rate 1/mean must itself be finite
        let service_rate = 1.0 / self.mean_service_time;
        if !(self.mean_service_time > 0.0
            && self.mean_service_time.is_finite()
            && service_rate.is_finite())
        {
            return Err(ConfigError::NonPositiveMeanServiceTime(self.mean_service_time));
        }
        if self.completion_threshold == 0 {
            return Err(ConfigError::ZeroCompletionThreshold);
        }
        Ok(())
    }

    pub fn service_rate(&self) -> f64 {
        1.0 / self.mean_service_time
    }
}
