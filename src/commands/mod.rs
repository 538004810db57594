//! CLI command implementations.
//!
//! Commands orchestrate the library components to perform user tasks.

pub mod demo;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use demo::{execute_demo, run_workload, validate_args};
pub use models::DemoArgs;
pub use utils::{display_schema, display_version, validate_report_file};
