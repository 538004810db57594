//! Process-wide statistics table.
//!
//! All mutation goes through one table-wide critical section, so
//! concurrent `record` calls never lose updates and `reset` is never
//! observed half done. Readers only ever get copies.

use super::path_key::PathKey;
use super::stats::RunningStats;
use crate::sampler::Measurement;
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct TableState {
    /// Bumped by every reset; snapshots remember the epoch they came from
    epoch: u64,
    entries: HashMap<PathKey, RunningStats>,
}

/// Aggregates measurements by path key
#[derive(Debug, Default)]
pub struct StatsAggregator {
    state: Mutex<TableState>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TableState> {
        // Nothing panics while the lock is held, so the data is consistent
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fold one measurement into the statistics for `path`
    pub fn record(&self, path: &PathKey, measurement: &Measurement) {
        let mut state = self.lock();
        match state.entries.get_mut(path) {
            Some(stats) => stats.record(measurement),
            None => {
                let mut stats = RunningStats::default();
                stats.record(measurement);
                state.entries.insert(path.clone(), stats);
            }
        }
    }

    /// Consistent copy of the whole table
    pub fn snapshot(&self) -> StatsTable {
        let state = self.lock();
        StatsTable {
            epoch: state.epoch,
            entries: state
                .entries
                .iter()
                .map(|(path, stats)| (path.clone(), *stats))
                .collect(),
        }
    }

    /// Drop every entry and invalidate outstanding snapshots
    pub fn reset(&self) {
        let mut state = self.lock();
        let dropped = state.entries.len();
        state.entries.clear();
        state.epoch += 1;
        debug!("Statistics reset ({} paths dropped, epoch {})", dropped, state.epoch);
    }

    /// Fold statistics gathered elsewhere into this table
    pub fn merge(&self, other: &StatsTable) {
        let mut state = self.lock();
        for (path, stats) in other.iter() {
            state.entries.entry(path.clone()).or_default().merge(stats);
        }
        debug!("Merged {} paths into statistics table", other.len());
    }

    pub fn epoch(&self) -> u64 {
        self.lock().epoch
    }

    /// Whether `table` was taken after the most recent reset
    pub fn is_current(&self, table: &StatsTable) -> bool {
        table.epoch == self.epoch()
    }
}

/// Read-only snapshot of the statistics table, ordered by path
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsTable {
    epoch: u64,
    entries: BTreeMap<PathKey, RunningStats>,
}

impl StatsTable {
    /// Build a detached table, e.g. from statistics loaded elsewhere
    pub fn from_entries(entries: impl IntoIterator<Item = (PathKey, RunningStats)>) -> Self {
        Self {
            epoch: 0,
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, path: &PathKey) -> Option<&RunningStats> {
        self.entries.get(path)
    }

    /// Lookup by labels, outermost first
    pub fn get_labels(&self, labels: &[&str]) -> Option<&RunningStats> {
        self.entries.get(&PathKey::from_labels(labels.iter().copied()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathKey, &RunningStats)> {
        self.entries.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathKey> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}
