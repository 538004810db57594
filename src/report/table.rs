//! Tabular statistics report.
//!
//! Derived values (share of root time, share of parent time, standard
//! deviations) are computed here from a snapshot; the table itself only
//! stores running moments.

use super::units::format_bytes;
use crate::aggregator::{PathKey, RunningStats, StatsTable};
use serde::{Deserialize, Serialize};

/// One line of the statistics report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRow {
    pub path: PathKey,
    pub count: u64,
    pub mean_time_secs: f64,
    pub stddev_time_secs: f64,

    /// Total time of this path relative to its outermost region
    pub percent_of_total: f64,

    /// Total time of this path relative to the enclosing region
    pub percent_of_parent: f64,

    pub mean_memory_bytes: f64,
    pub stddev_memory_bytes: f64,
}

/// Build report rows, ordered by path
pub fn build_rows(table: &StatsTable) -> Vec<StatsRow> {
    table
        .iter()
        .map(|(path, stats)| {
            let percent_of_total = path
                .root()
                .and_then(|root| table.get(&root))
                .map(|root| share(stats, root))
                .unwrap_or(100.0);

            let percent_of_parent = path
                .parent()
                .and_then(|parent| table.get(&parent))
                .map(|parent| share(stats, parent))
                .unwrap_or(100.0);

            StatsRow {
                path: path.clone(),
                count: stats.count(),
                mean_time_secs: stats.mean_time(),
                stddev_time_secs: stats.stddev_time(),
                percent_of_total,
                percent_of_parent,
                mean_memory_bytes: stats.mean_memory(),
                stddev_memory_bytes: stats.stddev_memory(),
            }
        })
        .collect()
}

/// Percentage of `of`'s total time spent in `part`
fn share(part: &RunningStats, of: &RunningStats) -> f64 {
    let whole = total_time(of);
    if whole > 0.0 {
        total_time(part) / whole * 100.0
    } else {
        100.0
    }
}

fn total_time(stats: &RunningStats) -> f64 {
    stats.mean_time() * stats.count() as f64
}

/// Render a snapshot as an aligned text table
///
/// ```text
/// foo       =  100% of total =  100% of parent = (0.30 +/- 0.00) sec =   2 calls using (0.0 +/- 0.0) B
/// foo > bar =   67% of total =   67% of parent = (0.20 +/- 0.00) sec =   2 calls using (0.0 +/- 0.0) B
/// ```
pub fn format_stats(table: &StatsTable) -> String {
    let rows = build_rows(table);
    let labels: Vec<String> = rows.iter().map(|row| row.path.to_string()).collect();
    let width = labels.iter().map(|label| label.chars().count()).max().unwrap_or(0);

    rows.iter()
        .zip(labels.iter())
        .map(|(row, label)| format_row(row, label, width))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_row(row: &StatsRow, label: &str, width: usize) -> String {
    let (mem_mean, mem_unit, mem_divisor) = format_bytes(row.mean_memory_bytes);
    let mem_stddev = row.stddev_memory_bytes / mem_divisor;

    format!(
        "{:<width$} = {:4.0}% of total = {:4.0}% of parent = ({:.2} +/- {:.2}) sec = {:>3} calls using ({:.1} +/- {:.1}) {}",
        label,
        row.percent_of_total,
        row.percent_of_parent,
        row.mean_time_secs,
        row.stddev_time_secs,
        row.count,
        mem_mean,
        mem_stddev,
        mem_unit,
        width = width,
    )
}
