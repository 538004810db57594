//! Running statistics with O(1) memory per path.
//!
//! Mean and variance are maintained with Welford's online update and
//! combined across tables with the pairwise formula of Chan et al.,
//! so no sample history is kept.

use crate::sampler::Measurement;
use serde::{Deserialize, Serialize};

/// Count, mean and sum of squared deviations of a stream of values
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    count: u64,
    mean: f64,
    m2: f64,
}

impl Moments {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Fold another accumulator into this one
    pub fn merge(&mut self, other: &Moments) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }

        let total = (self.count + other.count) as f64;
        let delta = other.mean - self.mean;
        let (n_a, n_b) = (self.count as f64, other.count as f64);

        self.mean += delta * n_b / total;
        self.m2 += other.m2 + delta * delta * n_a * n_b / total;
        self.count += other.count;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance (n - 1 denominator); 0 with fewer than two values
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn stddev(&self) -> f64 {
        self.variance().sqrt()
    }
}

/// Statistics for one path key
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningStats {
    /// Elapsed time, seconds
    pub time: Moments,

    /// Memory delta, bytes (unavailable readings count as 0)
    pub memory: Moments,
}

impl RunningStats {
    pub fn record(&mut self, measurement: &Measurement) {
        self.time.push(measurement.elapsed.as_secs_f64());
        self.memory.push(measurement.memory_delta.unwrap_or(0) as f64);
    }

    pub fn merge(&mut self, other: &RunningStats) {
        self.time.merge(&other.time);
        self.memory.merge(&other.memory);
    }

    pub fn count(&self) -> u64 {
        self.time.count()
    }

    pub fn mean_time(&self) -> f64 {
        self.time.mean()
    }

    pub fn stddev_time(&self) -> f64 {
        self.time.stddev()
    }

    pub fn mean_memory(&self) -> f64 {
        self.memory.mean()
    }

    pub fn stddev_memory(&self) -> f64 {
        self.memory.stddev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn naive_variance(values: &[f64]) -> f64 {
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64
    }

    #[test]
    fn test_moments_match_two_pass() {
        let values = [0.3, 0.1, 0.25, 0.7, 0.05, 0.3];
        let mut moments = Moments::default();
        for v in values {
            moments.push(v);
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        assert_eq!(moments.count(), 6);
        assert!((moments.mean() - mean).abs() < 1e-12);
        assert!((moments.variance() - naive_variance(&values)).abs() < 1e-12);
    }

    #[test]
    fn test_single_value_has_zero_variance() {
        let mut moments = Moments::default();
        moments.push(42.0);
        assert_eq!(moments.variance(), 0.0);
        assert_eq!(moments.stddev(), 0.0);
        assert_eq!(moments.mean(), 42.0);
    }

    #[test]
    fn test_merge_equals_sequential() {
        let left = [1.0, 2.0, 3.0];
        let right = [10.0, 20.0];

        let mut a = Moments::default();
        left.iter().for_each(|v| a.push(*v));
        let mut b = Moments::default();
        right.iter().for_each(|v| b.push(*v));
        a.merge(&b);

        let mut all = Moments::default();
        left.iter().chain(right.iter()).for_each(|v| all.push(*v));

        assert_eq!(a.count(), all.count());
        assert!((a.mean() - all.mean()).abs() < 1e-12);
        assert!((a.variance() - all.variance()).abs() < 1e-9);
    }

    #[test]
    fn test_merge_into_empty() {
        let mut empty = Moments::default();
        let mut other = Moments::default();
        other.push(5.0);
        empty.merge(&other);
        assert_eq!(empty, other);

        other.merge(&Moments::default());
        assert_eq!(other.count(), 1);
    }

    #[test]
    fn test_running_stats_records_time_and_memory() {
        let mut stats = RunningStats::default();
        stats.record(&Measurement::new(Duration::from_millis(300), Some(-2048), None));
        stats.record(&Measurement::new(Duration::from_millis(100), None, None));

        assert_eq!(stats.count(), 2);
        assert!((stats.mean_time() - 0.2).abs() < 1e-9);
        assert!((stats.mean_memory() - -1024.0).abs() < 1e-9);
    }
}
