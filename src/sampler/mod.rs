//! Sampling of time and memory around a region.
//!
//! A `Sample` is taken when a region starts and again when it stops;
//! `measure` turns the pair into an immutable `Measurement`.

pub mod clock;
pub mod memory;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use memory::{MemoryProbe, NullMemoryProbe, ProcessMemoryProbe};

use crate::utils::error::ClockError;
use std::sync::Arc;
use std::time::Duration;

/// One reading of the clock and of process memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Timestamp from the sampler's clock
    pub at: Duration,

    /// Process memory in bytes, if the probe could read it
    pub memory: Option<u64>,

    /// Wall time spent in the collection pass, if one ran
    pub collection: Option<Duration>,
}

/// Result of one region execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    /// Time between entry and exit
    pub elapsed: Duration,

    /// Memory at exit minus memory at entry; `None` if either reading was missing
    pub memory_delta: Option<i64>,

    /// Total time spent in collection passes around the region
    pub collection: Option<Duration>,
}

impl Measurement {
    pub fn new(elapsed: Duration, memory_delta: Option<i64>, collection: Option<Duration>) -> Self {
        Self {
            elapsed,
            memory_delta,
            collection,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Takes samples from an injected clock and memory probe
#[derive(Clone)]
pub struct Sampler {
    clock: Arc<dyn Clock>,
    memory: Arc<dyn MemoryProbe>,
}

impl Sampler {
    pub fn new(clock: Arc<dyn Clock>, memory: Arc<dyn MemoryProbe>) -> Self {
        Self { clock, memory }
    }

    /// Sample taken as a region starts.
    ///
    /// The collection pass and the memory reading happen before the
    /// timestamp so neither is billed to the region.
    pub fn sample_entry(&self, collect: bool) -> Sample {
        let collection = collect.then(|| self.run_collection());
        let memory = self.memory.read_process_memory_bytes();
        Sample {
            at: self.clock.now(),
            memory,
            collection,
        }
    }

    /// Sample taken as a region stops.
    ///
    /// The timestamp comes first; collection and memory follow.
    pub fn sample_exit(&self, collect: bool) -> Sample {
        let at = self.clock.now();
        let collection = collect.then(|| self.run_collection());
        Sample {
            at,
            memory: self.memory.read_process_memory_bytes(),
            collection,
        }
    }

    fn run_collection(&self) -> Duration {
        let start = self.clock.now();
        self.memory.collect();
        self.clock.now().saturating_sub(start)
    }

    /// Combine an entry and an exit sample
    ///
    /// # Errors
    /// * `ClockError::NonMonotonic` - exit timestamp precedes entry timestamp
    pub fn measure(entry: &Sample, exit: &Sample) -> Result<Measurement, ClockError> {
        let elapsed = exit
            .at
            .checked_sub(entry.at)
            .ok_or(ClockError::NonMonotonic {
                entry: entry.at,
                exit: exit.at,
            })?;

        let memory_delta = match (entry.memory, exit.memory) {
            (Some(start), Some(end)) => Some(end as i64 - start as i64),
            _ => None,
        };

        let collection = match (entry.collection, exit.collection) {
            (None, None) => None,
            (a, b) => Some(a.unwrap_or_default() + b.unwrap_or_default()),
        };

        Ok(Measurement::new(elapsed, memory_delta, collection))
    }
}

impl std::fmt::Debug for Sampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sampler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    /// Probe that reports a scripted value and counts collections
    #[derive(Default)]
    struct ScriptedProbe {
        bytes: AtomicU64,
        collections: AtomicUsize,
    }

    impl MemoryProbe for ScriptedProbe {
        fn read_process_memory_bytes(&self) -> Option<u64> {
            Some(self.bytes.load(Ordering::SeqCst))
        }

        fn collect(&self) {
            self.collections.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn sample(at_ms: u64, memory: Option<u64>) -> Sample {
        Sample {
            at: Duration::from_millis(at_ms),
            memory,
            collection: None,
        }
    }

    #[test]
    fn test_measure_elapsed_and_memory() {
        let m = Sampler::measure(&sample(100, Some(4096)), &sample(400, Some(1024))).unwrap();
        assert_eq!(m.elapsed, Duration::from_millis(300));
        // Negative deltas are kept as is
        assert_eq!(m.memory_delta, Some(-3072));
        assert_eq!(m.collection, None);
    }

    #[test]
    fn test_measure_missing_memory() {
        let m = Sampler::measure(&sample(0, None), &sample(10, Some(1024))).unwrap();
        assert_eq!(m.memory_delta, None);
    }

    #[test]
    fn test_measure_rejects_backwards_clock() {
        let err = Sampler::measure(&sample(500, None), &sample(400, None)).unwrap_err();
        assert_eq!(
            err,
            ClockError::NonMonotonic {
                entry: Duration::from_millis(500),
                exit: Duration::from_millis(400),
            }
        );
    }

    #[test]
    fn test_collection_runs_only_when_asked() {
        let probe = Arc::new(ScriptedProbe::default());
        let sampler = Sampler::new(Arc::new(ManualClock::new()), probe.clone());

        let entry = sampler.sample_entry(false);
        let exit = sampler.sample_exit(true);
        assert_eq!(probe.collections.load(Ordering::SeqCst), 1);
        assert!(entry.collection.is_none());
        assert_eq!(exit.collection, Some(Duration::ZERO));

        let m = Sampler::measure(&entry, &exit).unwrap();
        assert_eq!(m.collection, Some(Duration::ZERO));
        assert_eq!(m.memory_delta, Some(0));
    }
}
