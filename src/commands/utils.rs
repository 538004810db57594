use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Validate a stats report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating stats report: {}", file_path.display());

    let report = read_report(&file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;

    if report.version != SCHEMA_VERSION {
        log::warn!(
            "Report schema v{} differs from current v{}",
            report.version,
            SCHEMA_VERSION
        );
    }

    println!("✓ Valid stats report JSON");
    println!("  Version: {}", report.version);
    println!("  Generated: {}", report.generated_at);
    println!("  Paths: {}", report.entries.len());
    println!("  Top-level Regions: {}", report.roots().count());
    println!("  Total Calls: {}", report.total_calls());

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Time Block Stats Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string                - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string           - RFC 3339 timestamp");
        println!("  entries: array                 - One entry per call path");
        println!("    path: array of string        - Region labels, outermost first");
        println!("    count: number                - Number of recorded executions");
        println!("    mean_time_secs: number       - Mean elapsed time");
        println!("    stddev_time_secs: number     - Sample standard deviation of elapsed time");
        println!("    percent_of_total: number     - Share of the outermost region's time");
        println!("    percent_of_parent: number    - Share of the enclosing region's time");
        println!("    mean_memory_bytes: number    - Mean memory delta");
        println!("    stddev_memory_bytes: number  - Sample standard deviation of memory delta");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Time Block v{}", env!("CARGO_PKG_VERSION"));
    println!("Stats Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Time and memory instrumentation for nested code regions.");
}
