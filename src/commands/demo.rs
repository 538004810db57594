//! Demo command implementation.
//!
//! The demo command:
//! 1. Runs a synthetic nested and recursive workload through the engine
//! 2. Prints the statistics table
//! 3. Optionally writes the JSON stats report

use super::models::DemoArgs;
use crate::output::{write_report, StatsReport};
use crate::time_block::{RegionOptions, TimeBlock};
use crate::utils::config::{MAX_DEMO_DEPTH, MAX_DEMO_ITERATIONS, MAX_DEMO_THREADS};
use crate::args_label;
use anyhow::{Context, Result};
use log::{debug, info};
use std::thread;
use std::time::{Duration, Instant};

/// Size of the buffer allocated by the `allocate` region
const DEMO_ALLOCATION_BYTES: usize = 4 * 1024 * 1024;

/// Execute the demo command against `engine`
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The report built from the engine's statistics after the run
pub fn execute_demo(engine: &TimeBlock, args: &DemoArgs) -> Result<StatsReport> {
    let start_time = Instant::now();

    info!(
        "Running demo workload: {} iteration(s) on {} thread(s), recursion depth {}",
        args.iterations, args.threads, args.depth
    );

    // Step 1: Run workload
    info!("Step 1/3: Running workload...");
    run_workload(engine, args).context("Demo workload failed")?;

    // Step 2: Print statistics
    info!("Step 2/3: Collecting statistics...");
    let table = engine.snapshot();
    println!("\n{}", "=".repeat(80));
    println!("TIME BLOCK STATISTICS");
    println!("{}", "=".repeat(80));
    println!("{}", crate::report::format_stats(&table));
    println!("{}", "=".repeat(80));

    // Step 3: Write report (if requested)
    let report = StatsReport::from_table(&table);
    match &args.output_json {
        Some(path) => {
            info!("Step 3/3: Writing stats report...");
            write_report(&report, path).context("Failed to write stats report JSON")?;
            info!("✓ Stats report written to: {}", path.display());
        }
        None => info!("Step 3/3: Skipping stats report (not requested)"),
    }

    info!("Demo completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(report)
}

/// Run the synthetic workload on the requested number of threads
///
/// **Public** - usable without printing or writing files
pub fn run_workload(engine: &TimeBlock, args: &DemoArgs) -> Result<()> {
    if args.threads <= 1 {
        run_iterations(engine, args);
        return Ok(());
    }

    thread::scope(|scope| {
        let handles = (0..args.threads)
            .map(|i| {
                thread::Builder::new()
                    .name(format!("worker-{}", i))
                    .spawn_scoped(scope, move || run_iterations(engine, args))
                    .with_context(|| format!("Failed to spawn worker thread {}", i))
            })
            .collect::<Result<Vec<_>>>()?;

        for handle in handles {
            if handle.join().is_err() {
                anyhow::bail!("A demo worker thread panicked");
            }
        }
        Ok(())
    })
}

fn run_iterations(engine: &TimeBlock, args: &DemoArgs) {
    let options = region_options(args);

    for iteration in 0..args.iterations {
        let _demo = engine.enter_with("demo", options);

        engine.time_with("setup", options, || sleep(args));

        recurse(engine, args.depth, options, args);

        engine.time_with(
            "allocate",
            options.with_collect_garbage(args.collect_garbage),
            || {
                let buffer = vec![1u8; DEMO_ALLOCATION_BYTES];
                sleep(args);
                buffer.iter().map(|b| *b as usize).sum::<usize>()
            },
        );

        let checked = engine.time_result(args_label!("check", iteration % 2), options, || {
            if iteration % 2 == 1 {
                Err(format!("iteration {} rejected", iteration))
            } else {
                Ok(())
            }
        });
        if let Err(e) = checked {
            debug!("Demo check failed as planned: {}", e);
        }
    }
}

fn recurse(engine: &TimeBlock, remaining: usize, options: RegionOptions, args: &DemoArgs) {
    if remaining == 0 {
        return;
    }
    let _region = engine.enter_with("recurse", options);
    sleep(args);
    recurse(engine, remaining - 1, options, args);
}

fn region_options(args: &DemoArgs) -> RegionOptions {
    if args.quiet {
        RegionOptions::quiet()
    } else {
        RegionOptions::default()
    }
}

fn sleep(args: &DemoArgs) {
    if args.sleep_ms > 0 {
        thread::sleep(Duration::from_millis(args.sleep_ms));
    }
}

/// Validate demo arguments
///
/// **Public** - can be called before execute_demo for early validation
pub fn validate_args(args: &DemoArgs) -> Result<()> {
    if args.iterations == 0 {
        anyhow::bail!("Iterations must be greater than 0");
    }
    if args.iterations > MAX_DEMO_ITERATIONS {
        anyhow::bail!("Iterations too large (max {})", MAX_DEMO_ITERATIONS);
    }

    if args.depth == 0 {
        anyhow::bail!("Recursion depth must be greater than 0");
    }
    if args.depth > MAX_DEMO_DEPTH {
        anyhow::bail!("Recursion depth too large (max {})", MAX_DEMO_DEPTH);
    }

    if args.threads == 0 {
        anyhow::bail!("Thread count must be greater than 0");
    }
    if args.threads > MAX_DEMO_THREADS {
        anyhow::bail!("Thread count too large (max {})", MAX_DEMO_THREADS);
    }

    if let Some(path) = &args.output_json {
        if path.as_os_str().is_empty() {
            anyhow::bail!("Output path cannot be empty");
        }
    }

    Ok(())
}
