//! Events emitted while regions run.
//!
//! Reporters receive one `EnterEvent` when a region starts and one
//! `ExitEvent` after its measurement has been recorded. Formatting and
//! destination are entirely up to the reporter.

pub mod logger;

pub use logger::LogReporter;

use crate::aggregator::PathKey;
use crate::context::ExecutionContextId;
use crate::sampler::Measurement;
use crate::time_block::RegionOptions;
use crate::utils::config::PATH_SEPARATOR;

/// A region has started
#[derive(Debug, Clone, Copy)]
pub struct EnterEvent<'a> {
    pub context: ExecutionContextId,

    /// Display-only label of the context (empty for the main thread)
    pub root_label: &'a str,

    /// Path including the region that just started
    pub path: &'a PathKey,

    pub options: &'a RegionOptions,
}

/// A region has stopped and its measurement has been recorded
#[derive(Debug, Clone, Copy)]
pub struct ExitEvent<'a> {
    pub context: ExecutionContextId,
    pub root_label: &'a str,
    pub path: &'a PathKey,
    pub options: &'a RegionOptions,
    pub measurement: &'a Measurement,

    /// The wrapped code panicked or returned an error
    pub failed: bool,
}

impl EnterEvent<'_> {
    /// Root label and path, e.g. `" > foo > bar"` on the main thread
    pub fn qualified_name(&self) -> String {
        qualified_name(self.root_label, self.path)
    }
}

impl ExitEvent<'_> {
    pub fn qualified_name(&self) -> String {
        qualified_name(self.root_label, self.path)
    }
}

fn qualified_name(root_label: &str, path: &PathKey) -> String {
    format!("{}{}{}", root_label, PATH_SEPARATOR, path)
}

/// Consumer of region events
pub trait Reporter: Send + Sync {
    fn on_enter(&self, event: &EnterEvent<'_>);

    fn on_exit(&self, event: &ExitEvent<'_>);
}
