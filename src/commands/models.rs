use crate::utils::config::{
    DEFAULT_DEMO_DEPTH, DEFAULT_DEMO_ITERATIONS, DEFAULT_DEMO_SLEEP_MS, DEFAULT_DEMO_THREADS,
};
use std::path::PathBuf;

/// Arguments for the demo command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct DemoArgs {
    /// Times the workload runs on each thread
    pub iterations: usize,

    /// Recursion depth of the recursive region
    pub depth: usize,

    /// Number of worker threads (1 = run on the calling thread)
    pub threads: usize,

    /// Sleep inside each leaf region, in milliseconds
    pub sleep_ms: u64,

    /// Run a collection pass around the allocating region
    pub collect_garbage: bool,

    /// Silence per-region log events
    pub quiet: bool,

    /// Output path for the JSON stats report (optional)
    pub output_json: Option<PathBuf>,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_DEMO_ITERATIONS,
            depth: DEFAULT_DEMO_DEPTH,
            threads: DEFAULT_DEMO_THREADS,
            sleep_ms: DEFAULT_DEMO_SLEEP_MS,
            collect_garbage: false,
            quiet: false,
            output_json: None,
        }
    }
}
