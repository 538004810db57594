//! Configuration and constants shared by the library and the CLI.

/// Separator used when a path key is rendered for humans
pub const PATH_SEPARATOR: &str = " > ";

/// Current stats export schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// `log` target used by the log reporter
pub const LOG_TARGET: &str = "time_block";

// Defaults for the `demo` command
pub const DEFAULT_DEMO_ITERATIONS: usize = 3;
pub const DEFAULT_DEMO_DEPTH: usize = 3;
pub const DEFAULT_DEMO_THREADS: usize = 1;
pub const DEFAULT_DEMO_SLEEP_MS: u64 = 10;

// Upper bounds accepted by the `demo` command
pub const MAX_DEMO_ITERATIONS: usize = 10_000;
pub const MAX_DEMO_DEPTH: usize = 64;
pub const MAX_DEMO_THREADS: usize = 256;
