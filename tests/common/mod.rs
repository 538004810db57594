//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use time_block::sampler::{ManualClock, MemoryProbe, NullMemoryProbe};
use time_block::{EnterEvent, ExitEvent, Reporter, TimeBlock};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Enter {
        path: String,
    },
    Exit {
        path: String,
        elapsed: Duration,
        memory_delta: Option<i64>,
        collection: Option<Duration>,
        failed: bool,
    },
}

/// Reporter that keeps every event in order
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<Event>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn exits(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|event| matches!(event, Event::Exit { .. }))
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn on_enter(&self, event: &EnterEvent<'_>) {
        self.events.lock().unwrap().push(Event::Enter {
            path: event.path.to_string(),
        });
    }

    fn on_exit(&self, event: &ExitEvent<'_>) {
        self.events.lock().unwrap().push(Event::Exit {
            path: event.path.to_string(),
            elapsed: event.measurement.elapsed,
            memory_delta: event.measurement.memory_delta,
            collection: event.measurement.collection,
            failed: event.failed,
        });
    }
}

/// Memory probe with a settable reading whose collection pass takes a
/// fixed amount of manual-clock time
pub struct ScriptedProbe {
    pub bytes: AtomicU64,
    pub collections: AtomicUsize,
    clock: Arc<ManualClock>,
    collection_cost: Duration,
}

impl ScriptedProbe {
    pub fn new(clock: Arc<ManualClock>, collection_cost: Duration) -> Self {
        Self {
            bytes: AtomicU64::new(0),
            collections: AtomicUsize::new(0),
            clock,
            collection_cost,
        }
    }

    pub fn set(&self, bytes: u64) {
        self.bytes.store(bytes, Ordering::SeqCst);
    }

    pub fn collections(&self) -> usize {
        self.collections.load(Ordering::SeqCst)
    }
}

impl MemoryProbe for ScriptedProbe {
    fn read_process_memory_bytes(&self) -> Option<u64> {
        Some(self.bytes.load(Ordering::SeqCst))
    }

    fn collect(&self) {
        self.collections.fetch_add(1, Ordering::SeqCst);
        self.clock.advance(self.collection_cost);
    }
}

/// Engine driven by a manual clock, without memory readings or logging
pub fn manual_engine() -> (TimeBlock, Arc<ManualClock>, Arc<RecordingReporter>) {
    let clock = Arc::new(ManualClock::new());
    let reporter = Arc::new(RecordingReporter::default());
    let engine = TimeBlock::builder()
        .with_clock(clock.clone())
        .with_memory_probe(Arc::new(NullMemoryProbe))
        .with_reporter(reporter.clone())
        .with_log_reporter(false)
        .build();
    (engine, clock, reporter)
}

/// Engine with the real clock, for multi-threaded tests
pub fn real_engine() -> TimeBlock {
    TimeBlock::builder()
        .with_memory_probe(Arc::new(NullMemoryProbe))
        .with_log_reporter(false)
        .build()
}
