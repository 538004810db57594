//! Text reports built from statistics snapshots.

pub mod table;
pub mod units;

pub use table::{build_rows, format_stats, StatsRow};
pub use units::format_bytes;
