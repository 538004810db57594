//! Time Block CLI
//!
//! Runs an instrumented demo workload and inspects stats reports.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use time_block::commands::{
    display_schema, display_version, execute_demo, validate_args, validate_report_file, DemoArgs,
};
use time_block::utils::config::{
    DEFAULT_DEMO_DEPTH, DEFAULT_DEMO_ITERATIONS, DEFAULT_DEMO_SLEEP_MS, DEFAULT_DEMO_THREADS,
};

/// Time Block - time and memory of nested code regions
#[derive(Parser, Debug)]
#[command(name = "time-block")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (shows region events)
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run an instrumented demo workload and print its statistics
    Demo {
        /// Times the workload runs on each thread
        #[arg(short, long, env = "TIME_BLOCK_ITERATIONS", default_value_t = DEFAULT_DEMO_ITERATIONS)]
        iterations: usize,

        /// Recursion depth of the recursive region
        #[arg(short, long, default_value_t = DEFAULT_DEMO_DEPTH)]
        depth: usize,

        /// Number of worker threads
        #[arg(short, long, env = "TIME_BLOCK_THREADS", default_value_t = DEFAULT_DEMO_THREADS)]
        threads: usize,

        /// Sleep inside each leaf region, in milliseconds
        #[arg(long, default_value_t = DEFAULT_DEMO_SLEEP_MS)]
        sleep_ms: u64,

        /// Run a collection pass around the allocating region (a no-op for
        /// the process probe; reports memory and pass time)
        #[arg(long)]
        gc: bool,

        /// Do not log per-region events
        #[arg(short, long)]
        quiet: bool,

        /// Output path for the JSON stats report
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Validate a stats report JSON file
    Validate {
        /// Path to stats report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Demo {
            iterations,
            depth,
            threads,
            sleep_ms,
            gc,
            quiet,
            json,
        } => {
            let args = DemoArgs {
                iterations,
                depth,
                threads,
                sleep_ms,
                collect_garbage: gc,
                quiet,
                output_json: json,
            };

            // Validate args first
            validate_args(&args)?;

            execute_demo(time_block::global(), &args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
