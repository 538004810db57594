//! Time Block
//!
//! Measures elapsed time and memory delta of nested, labeled code
//! regions, reports each region as it starts and stops, and keeps
//! running statistics per call path (`foo > bar > baz`).
//!
//! ## Getting Started
//!
//! ```
//! let _outer = time_block::enter("load config");
//! {
//!     let _inner = time_block::enter("parse");
//!     // ... work ...
//! }
//! drop(_outer);
//!
//! let stats = time_block::get_stats();
//! assert!(stats.get_labels(&["load config", "parse"]).is_some());
//! println!("{}", time_block::format_stats());
//! ```
//!
//! Events go through the `log` facade at `debug` level under the
//! `time_block` target; install any logger to see them.

pub mod aggregator;
pub mod commands;
pub mod context;
pub mod output;
pub mod report;
pub mod reporter;
pub mod sampler;
pub mod time_block;
pub mod utils;

pub use aggregator::{PathKey, RunningStats, StatsTable};
pub use context::ExecutionContextId;
pub use reporter::{EnterEvent, ExitEvent, LogReporter, Reporter};
pub use sampler::{Measurement, MemoryProbe};
pub use time_block::{RegionGuard, RegionOptions, TimeBlock, TimeBlockBuilder};

use std::sync::OnceLock;

static GLOBAL: OnceLock<TimeBlock> = OnceLock::new();

/// Process-wide instance used by the free functions below
pub fn global() -> &'static TimeBlock {
    GLOBAL.get_or_init(TimeBlock::new)
}

/// Start a region on the calling thread
pub fn enter(label: impl Into<String>) -> RegionGuard<'static> {
    global().enter(label)
}

pub fn enter_with(label: impl Into<String>, options: RegionOptions) -> RegionGuard<'static> {
    global().enter_with(label, options)
}

/// Run `f` inside a region
pub fn time<T>(label: impl Into<String>, f: impl FnOnce() -> T) -> T {
    global().time(label, f)
}

pub fn get_stats() -> StatsTable {
    global().get_stats()
}

pub fn clear() {
    global().clear()
}

pub fn add_stats(other: &StatsTable) {
    global().add_stats(other)
}

pub fn format_stats() -> String {
    global().format_stats()
}

pub fn print_stats() {
    global().print_stats()
}

/// Label a region with its call arguments, rendered with `Debug`
///
/// ```
/// let n = 3;
/// assert_eq!(time_block::args_label!("fib", n), "fib(3)");
/// assert_eq!(time_block::args_label!("open", "a.txt", true), "open(\"a.txt\", true)");
/// assert_eq!(time_block::args_label!("main"), "main");
/// ```
#[macro_export]
macro_rules! args_label {
    ($name:expr) => {
        ::std::string::String::from($name)
    };
    ($name:expr, $($arg:expr),+ $(,)?) => {{
        let args: ::std::vec::Vec<::std::string::String> =
            ::std::vec![$(::std::format!("{:?}", $arg)),+];
        ::std::format!("{}({})", $name, args.join(", "))
    }};
}
