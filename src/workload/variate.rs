use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Inverse-transform sample `-ln(1 - u) / rate` of an exponential distribution
/// with mean `1 / rate`.
///
/// Returns `None` when `u` is outside the open interval (0, 1), when `rate` is
/// not a positive finite number, or when the result is not a positive finite
/// value.
pub fn exponential(u: f64, rate: f64) -> Option<f64> {
    if !(u > 0.0 && u < 1.0) || !(rate > 0.0 && rate.is_finite()) {
        return None;
    }
    let value = -(1.0 - u).ln() / rate;
    (value > 0.0 && value.is_finite()).then_some(value)
}

/// Source of the two random quantities that drive an open workload.
pub trait VariateSource {
    /// Time until the next arrival for a process stream with rate `arrival_rate`.
    fn interarrival_gap(&mut self, arrival_rate: f64) -> f64;

    /// CPU demand of a new process.
    fn service_demand(&mut self, mean_service_time: f64) -> f64;
}

/// Exponential inter-arrival gaps and service demands drawn from an injected
/// RNG.
#[derive(Debug, Clone)]
pub struct ExponentialVariates<R: Rng = StdRng> {
    rng: R,
}

impl<R: Rng> ExponentialVariates<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn draw(&mut self, rate: f64) -> f64 {
        assert!(
            rate > 0.0 && rate.is_finite(),
            "Exponential rate must be positive and finite, got {rate}"
        );
        // A uniform draw of exactly 0 gives a zero-length variate; resample it
        loop {
            let u: f64 = self.rng.random();
            if let Some(value) = exponential(u, rate) {
                return value;
            }
        }
    }
}

impl ExponentialVariates<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> VariateSource for ExponentialVariates<R> {
    fn interarrival_gap(&mut self, arrival_rate: f64) -> f64 {
        self.draw(arrival_rate)
    }

    fn service_demand(&mut self, mean_service_time: f64) -> f64 {
        self.draw(1.0 / mean_service_time)
    }
}

/// Replays recorded gaps and service demands, ignoring the rate parameters.
///
/// Once a sequence is exhausted its last value repeats.
#[derive(Debug, Clone)]
pub struct TraceVariates {
    gaps: Vec<f64>,
    services: Vec<f64>,
    gap_cursor: usize,
    service_cursor: usize,
}

impl TraceVariates {
    pub fn new(gaps: Vec<f64>, services: Vec<f64>) -> Self {
        assert!(
            !gaps.is_empty() && !services.is_empty(),
            "Trace needs at least one gap and one service demand"
        );
        assert!(
            gaps.iter().all(|g| *g >= 0.0 && g.is_finite()),
            "Trace gaps must be non-negative and finite"
        );
        assert!(
            services.iter().all(|s| *s > 0.0 && s.is_finite()),
            "Trace service demands must be positive and finite"
        );
        Self {
            gaps,
            services,
            gap_cursor: 0,
            service_cursor: 0,
        }
    }

    fn next_from(values: &[f64], cursor: &mut usize) -> f64 {
        let value = values[(*cursor).min(values.len() - 1)];
        *cursor += 1;
        value
    }
}

impl VariateSource for TraceVariates {
    fn interarrival_gap(&mut self, _arrival_rate: f64) -> f64 {
        Self::next_from(&self.gaps, &mut self.gap_cursor)
    }

    fn service_demand(&mut self, _mean_service_time: f64) -> f64 {
        Self::next_from(&self.services, &mut self.service_cursor)
    }
}
