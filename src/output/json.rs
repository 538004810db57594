//! JSON statistics export.
//!
//! A report is a one-shot, versioned dump of a snapshot. It is meant for
//! CI artifacts and offline comparison; nothing reloads it into a live
//! table automatically.

use super::validate_path;
use crate::aggregator::{PathKey, StatsTable};
use crate::report::build_rows;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Top-level report structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated (RFC 3339)
    pub generated_at: String,

    /// One entry per call path, ordered by path
    pub entries: Vec<StatsEntry>,
}

/// Statistics of one call path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsEntry {
    /// Labels, outermost first
    pub path: PathKey,

    pub count: u64,
    pub mean_time_secs: f64,
    pub stddev_time_secs: f64,
    pub percent_of_total: f64,
    pub percent_of_parent: f64,
    pub mean_memory_bytes: f64,
    pub stddev_memory_bytes: f64,
}

impl StatsReport {
    /// Build a report from a snapshot, stamped with the current time
    pub fn from_table(table: &StatsTable) -> Self {
        let entries = build_rows(table)
            .into_iter()
            .map(|row| StatsEntry {
                path: row.path,
                count: row.count,
                mean_time_secs: row.mean_time_secs,
                stddev_time_secs: row.stddev_time_secs,
                percent_of_total: row.percent_of_total,
                percent_of_parent: row.percent_of_parent,
                mean_memory_bytes: row.mean_memory_bytes,
                stddev_memory_bytes: row.stddev_memory_bytes,
            })
            .collect();

        Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            entries,
        }
    }

    /// Total number of recorded region executions
    pub fn total_calls(&self) -> u64 {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    /// Entries for top-level regions
    pub fn roots(&self) -> impl Iterator<Item = &StatsEntry> {
        self.entries.iter().filter(|entry| entry.path.depth() == 1)
    }
}

/// Write a report to a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let report = StatsReport::from_table(&time_block::get_stats());
/// write_report(&report, "stats.json")?;
/// ```
pub fn write_report(report: &StatsReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing stats report to: {}", output_path.display());

    validate_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report).map_err(OutputError::SerializationFailed)?;

    info!(
        "Stats report written successfully ({} paths, {} bytes)",
        report.entries.len(),
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Serialize a report without touching the filesystem
pub fn report_to_string(report: &StatsReport) -> Result<String, OutputError> {
    serde_json::to_string_pretty(report).map_err(OutputError::SerializationFailed)
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a report from a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_report(input_path: impl AsRef<Path>) -> Result<StatsReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading stats report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let report: StatsReport =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Stats report loaded: version {}, {} paths",
        report.version,
        report.entries.len()
    );

    Ok(report)
}
