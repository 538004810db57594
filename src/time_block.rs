//! The region-timing engine.
//!
//! `TimeBlock` wires the context registry, the sampler, the statistics
//! aggregator and the reporters together. Regions are scoped: entering
//! one returns a `RegionGuard`, and dropping the guard (normally, on
//! early return, or while unwinding from a panic) measures the region,
//! pops it, records it and emits the exit event exactly once.

use crate::aggregator::{PathKey, StatsAggregator, StatsTable};
use crate::context::{ContextRegistry, ExecutionContextId, FrameToken, RegionStack, SharedStack};
use crate::reporter::{EnterEvent, ExitEvent, LogReporter, Reporter};
use crate::report::format_stats;
use crate::sampler::{Clock, Measurement, MemoryProbe, MonotonicClock, ProcessMemoryProbe, Sampler};
use log::error;
use std::sync::{Arc, MutexGuard, PoisonError};
use std::thread;

/// Per-region behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionOptions {
    /// Emit the "running" event to the log reporter
    pub print_start: bool,

    /// Emit the measurement event to the log reporter
    pub print_stop: bool,

    /// Run the memory probe's collection pass around the region and
    /// report memory and collection time
    pub collect_garbage: bool,
}

impl Default for RegionOptions {
    fn default() -> Self {
        Self {
            print_start: true,
            print_stop: true,
            collect_garbage: false,
        }
    }
}

impl RegionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// No log output; the region is still measured and recorded
    pub fn quiet() -> Self {
        Self {
            print_start: false,
            print_stop: false,
            collect_garbage: false,
        }
    }

    pub fn with_print_start(mut self, print_start: bool) -> Self {
        self.print_start = print_start;
        self
    }

    pub fn with_print_stop(mut self, print_stop: bool) -> Self {
        self.print_stop = print_stop;
        self
    }

    pub fn with_collect_garbage(mut self, collect_garbage: bool) -> Self {
        self.collect_garbage = collect_garbage;
        self
    }
}

/// Builder for `TimeBlock`
pub struct TimeBlockBuilder {
    clock: Arc<dyn Clock>,
    memory: Arc<dyn MemoryProbe>,
    reporters: Vec<Arc<dyn Reporter>>,
    log_reporter: bool,
}

impl Default for TimeBlockBuilder {
    fn default() -> Self {
        Self {
            clock: Arc::new(MonotonicClock::new()),
            memory: Arc::new(ProcessMemoryProbe::new()),
            reporters: Vec::new(),
            log_reporter: true,
        }
    }
}

impl TimeBlockBuilder {
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_memory_probe(mut self, memory: Arc<dyn MemoryProbe>) -> Self {
        self.memory = memory;
        self
    }

    /// Add a reporter; reporters are called in insertion order
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporters.push(reporter);
        self
    }

    /// Whether to install `LogReporter` (on by default)
    pub fn with_log_reporter(mut self, enabled: bool) -> Self {
        self.log_reporter = enabled;
        self
    }

    pub fn build(self) -> TimeBlock {
        let mut reporters = self.reporters;
        if self.log_reporter {
            reporters.insert(0, Arc::new(LogReporter));
        }

        TimeBlock {
            registry: ContextRegistry::new(),
            aggregator: StatsAggregator::new(),
            sampler: Sampler::new(self.clock, self.memory),
            reporters,
        }
    }
}

/// Times nested regions and aggregates statistics per call path
pub struct TimeBlock {
    registry: ContextRegistry,
    aggregator: StatsAggregator,
    sampler: Sampler,
    reporters: Vec<Arc<dyn Reporter>>,
}

impl Default for TimeBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TimeBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeBlock")
            .field("contexts", &self.registry.context_count())
            .field("reporters", &self.reporters.len())
            .finish_non_exhaustive()
    }
}

impl TimeBlock {
    /// Monotonic clock, process RSS probe, log reporter
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> TimeBlockBuilder {
        TimeBlockBuilder::default()
    }

    /// Start a region on the calling thread with default options
    ///
    /// # Example
    /// ```
    /// let tb = time_block::TimeBlock::new();
    /// {
    ///     let _region = tb.enter("load");
    ///     // ... work ...
    /// }
    /// assert_eq!(tb.get_stats().get_labels(&["load"]).unwrap().count(), 1);
    /// ```
    pub fn enter(&self, label: impl Into<String>) -> RegionGuard<'_> {
        self.enter_with(label, RegionOptions::default())
    }

    /// Start a region on the calling thread
    pub fn enter_with(&self, label: impl Into<String>, options: RegionOptions) -> RegionGuard<'_> {
        let (context, stack) = self.registry.stack_for_current_thread();
        self.open_region(context, stack, label.into(), options)
    }

    /// Start a region in an explicit execution context
    ///
    /// Use this from cooperative task runtimes where one thread drives
    /// many logical tasks; each task id gets its own stack.
    pub fn enter_in(
        &self,
        context: ExecutionContextId,
        label: impl Into<String>,
        options: RegionOptions,
    ) -> RegionGuard<'_> {
        let stack = self.registry.stack_for(context);
        self.open_region(context, stack, label.into(), options)
    }

    /// Run `f` inside a region
    pub fn time<T>(&self, label: impl Into<String>, f: impl FnOnce() -> T) -> T {
        self.time_with(label, RegionOptions::default(), f)
    }

    pub fn time_with<T>(
        &self,
        label: impl Into<String>,
        options: RegionOptions,
        f: impl FnOnce() -> T,
    ) -> T {
        let _region = self.enter_with(label, options);
        f()
    }

    /// Run a fallible `f` inside a region
    ///
    /// An `Err` marks the exit event as failed and is returned unchanged
    /// after the measurement has been recorded.
    pub fn time_result<T, E>(
        &self,
        label: impl Into<String>,
        options: RegionOptions,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        let mut region = self.enter_with(label, options);
        let result = f();
        if result.is_err() {
            region.mark_failed();
        }
        drop(region);
        result
    }

    /// Consistent copy of all statistics
    pub fn snapshot(&self) -> StatsTable {
        self.aggregator.snapshot()
    }

    /// Alias of `snapshot`
    pub fn get_stats(&self) -> StatsTable {
        self.snapshot()
    }

    /// Drop all statistics; open regions keep running and record afterwards
    pub fn clear(&self) {
        self.aggregator.reset();
    }

    /// Fold statistics collected by another `TimeBlock` into this one
    pub fn add_stats(&self, other: &StatsTable) {
        self.aggregator.merge(other);
    }

    /// Whether `table` was taken since the last `clear`
    pub fn is_current(&self, table: &StatsTable) -> bool {
        self.aggregator.is_current(table)
    }

    pub fn format_stats(&self) -> String {
        format_stats(&self.snapshot())
    }

    pub fn print_stats(&self) {
        println!("{}", self.format_stats());
    }

    /// Number of open regions on the calling thread
    pub fn depth(&self) -> usize {
        let (_, stack) = self.registry.stack_for_current_thread();
        let depth = lock_stack(&stack).depth();
        depth
    }

    /// Number of open regions in `context`
    pub fn depth_in(&self, context: ExecutionContextId) -> usize {
        let stack = self.registry.stack_for(context);
        let depth = lock_stack(&stack).depth();
        depth
    }

    /// Labels of the regions open on the calling thread
    pub fn current_path(&self) -> PathKey {
        let (_, stack) = self.registry.stack_for_current_thread();
        let path = lock_stack(&stack).current_path();
        path
    }

    fn open_region(
        &self,
        context: ExecutionContextId,
        stack: SharedStack,
        label: String,
        options: RegionOptions,
    ) -> RegionGuard<'_> {
        let (path, root_label) = {
            let stack = lock_stack(&stack);
            (stack.current_path().child(label.as_str()), stack.root_label().to_string())
        };

        let event = EnterEvent {
            context,
            root_label: &root_label,
            path: &path,
            options: &options,
        };
        for reporter in &self.reporters {
            reporter.on_enter(&event);
        }

        // Sample last so reporter cost is not billed to the region
        let entry = self.sampler.sample_entry(options.collect_garbage);
        let token = lock_stack(&stack).enter(label, entry);

        RegionGuard {
            engine: self,
            context,
            stack,
            token: Some(token),
            options,
            failed: false,
        }
    }

    fn close_region(
        &self,
        context: ExecutionContextId,
        stack: &SharedStack,
        token: FrameToken,
        options: &RegionOptions,
        failed: bool,
    ) -> Option<Measurement> {
        let exit = self.sampler.sample_exit(options.collect_garbage);

        let (path, frame, root_label) = {
            let mut stack = lock_stack(stack);
            let path = stack.current_path();
            let frame = stack.exit(token);
            (path, frame, stack.root_label().to_string())
        };

        let Some(frame) = frame else {
            error!("Region exited on an empty stack in {}", context);
            return None;
        };

        let measurement = match Sampler::measure(&frame.entry, &exit) {
            Ok(measurement) => measurement,
            Err(e) => {
                error!("Timing contract violated in region {}: {}", path, e);
                panic!("time-block: {}", e);
            }
        };

        self.aggregator.record(&path, &measurement);

        let event = ExitEvent {
            context,
            root_label: &root_label,
            path: &path,
            options,
            measurement: &measurement,
            failed,
        };
        for reporter in &self.reporters {
            reporter.on_exit(&event);
        }

        Some(measurement)
    }
}

fn lock_stack(stack: &SharedStack) -> MutexGuard<'_, RegionStack> {
    // Only the owning context locks its stack, and never across user code
    stack.lock().unwrap_or_else(PoisonError::into_inner)
}

/// An open region; dropping it closes the region
///
/// Closing measures the region, pops it from its stack, records the
/// measurement and notifies reporters. This happens exactly once,
/// including when the guard is dropped while a panic unwinds, in which
/// case the exit event is marked as failed and the panic continues.
///
/// Guards must be dropped in reverse order of creation within one
/// execution context.
#[must_use = "the region closes as soon as the guard is dropped"]
pub struct RegionGuard<'a> {
    engine: &'a TimeBlock,
    context: ExecutionContextId,
    stack: SharedStack,
    token: Option<FrameToken>,
    options: RegionOptions,
    failed: bool,
}

impl RegionGuard<'_> {
    /// Report this region as failed when it closes
    pub fn mark_failed(&mut self) {
        self.failed = true;
    }

    pub fn context(&self) -> ExecutionContextId {
        self.context
    }

    /// Stack depth of this region (1 for a top-level region)
    pub fn depth(&self) -> usize {
        self.token.map(|token| token.depth()).unwrap_or(0)
    }

    /// Close the region now and return its measurement
    pub fn finish(mut self) -> Option<Measurement> {
        self.close()
    }

    fn close(&mut self) -> Option<Measurement> {
        let token = self.token.take()?;
        let failed = self.failed || thread::panicking();
        self.engine
            .close_region(self.context, &self.stack, token, &self.options, failed)
    }
}

impl Drop for RegionGuard<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for RegionGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionGuard")
            .field("context", &self.context)
            .field("depth", &self.depth())
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{ManualClock, NullMemoryProbe};
    use std::time::Duration;

    fn engine() -> (TimeBlock, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let tb = TimeBlock::builder()
            .with_clock(clock.clone())
            .with_memory_probe(Arc::new(NullMemoryProbe))
            .with_log_reporter(false)
            .build();
        (tb, clock)
    }

    #[test]
    fn test_region_guard_records_on_drop() {
        let (tb, clock) = engine();
        {
            let region = tb.enter("foo");
            assert_eq!(region.depth(), 1);
            assert_eq!(tb.depth(), 1);
            clock.advance(Duration::from_millis(300));
        }
        assert_eq!(tb.depth(), 0);

        let stats = tb.get_stats();
        let foo = stats.get_labels(&["foo"]).unwrap();
        assert_eq!(foo.count(), 1);
        assert!((foo.mean_time() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_finish_returns_measurement_once() {
        let (tb, clock) = engine();
        let region = tb.enter("foo");
        clock.advance(Duration::from_millis(50));
        let measurement = region.finish().unwrap();

        assert_eq!(measurement.elapsed, Duration::from_millis(50));
        assert_eq!(measurement.memory_delta, None);
        assert_eq!(tb.get_stats().get_labels(&["foo"]).unwrap().count(), 1);
    }

    #[test]
    fn test_current_path_inside_nested_regions() {
        let (tb, _) = engine();
        let outer = tb.enter("foo");
        let inner = tb.enter("bar");
        assert_eq!(tb.current_path(), PathKey::from_labels(["foo", "bar"]));
        drop(inner);
        drop(outer);
        assert!(tb.current_path().is_empty());
    }

    #[test]
    fn test_options_builders() {
        let options = RegionOptions::new()
            .with_print_start(false)
            .with_collect_garbage(true);
        assert!(!options.print_start);
        assert!(options.print_stop);
        assert!(options.collect_garbage);
        assert!(RegionOptions::quiet().with_print_stop(true).print_stop);
    }

    #[test]
    #[should_panic(expected = "clock went backwards")]
    fn test_backwards_clock_is_fatal() {
        let (tb, clock) = engine();
        clock.set(Duration::from_secs(10));
        let region = tb.enter("foo");
        clock.set(Duration::from_secs(1));
        let _ = region.finish();
    }
}
