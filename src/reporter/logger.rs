//! Reporter that writes events through the `log` facade.

use super::{EnterEvent, ExitEvent, Reporter};
use crate::report::format_bytes;
use crate::utils::config::LOG_TARGET;
use log::debug;

/// Logs ` > foo: running` on entry and ` > foo: 0.3s` on exit
///
/// Memory and collection time are appended for regions that asked for a
/// collection pass; ` (err)` marks regions left by a failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn on_enter(&self, event: &EnterEvent<'_>) {
        if event.options.print_start {
            debug!(target: LOG_TARGET, "{}", format_enter(event));
        }
    }

    fn on_exit(&self, event: &ExitEvent<'_>) {
        if event.options.print_stop {
            debug!(target: LOG_TARGET, "{}", format_exit(event));
        }
    }
}

pub fn format_enter(event: &EnterEvent<'_>) -> String {
    format!("{}: running", event.qualified_name())
}

pub fn format_exit(event: &ExitEvent<'_>) -> String {
    let measurement = event.measurement;
    let mut line = format!(
        "{}: {:.1}s",
        event.qualified_name(),
        measurement.elapsed_secs()
    );

    if event.options.collect_garbage {
        match measurement.memory_delta {
            Some(delta) => {
                let (value, unit, _) = format_bytes(delta as f64);
                line.push_str(&format!(" {:.1}{}", value, unit));
            }
            None => line.push_str(" n/a"),
        }
        let collection = measurement.collection.unwrap_or_default();
        line.push_str(&format!(" (gc: {:.1}s)", collection.as_secs_f64()));
    }

    if event.failed {
        line.push_str(" (err)");
    }

    line
}
