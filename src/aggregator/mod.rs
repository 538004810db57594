//! Aggregation of measurements into per-path statistics.
//!
//! This module provides:
//! - Path keys (ordered label sequences used as aggregation keys)
//! - Running statistics (count, mean, variance without history)
//! - The statistics table shared by every execution context

pub mod path_key;
pub mod stats;
pub mod table;

// Re-export main types
pub use path_key::PathKey;
pub use stats::{Moments, RunningStats};
pub use table::{StatsAggregator, StatsTable};
