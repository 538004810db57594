//! Per-context stack of open regions.
//!
//! Frames are pushed on entry and popped on exit in strict LIFO order.
//! Exiting anything but the top frame is a usage error: regions are
//! scoped constructs, and the whole path model relies on that nesting.
//! Debug builds fail fast on it; release builds pop the top frame.

use crate::aggregator::PathKey;
use crate::sampler::Sample;

/// One open region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionFrame {
    /// Final label as supplied by the caller
    pub label: String,

    /// Readings taken when the region started
    pub entry: Sample,
}

/// Handle returned by `enter`, required by the matching `exit`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a region that is entered must be exited"]
pub struct FrameToken {
    depth: usize,
}

impl FrameToken {
    /// Stack depth right after the frame was pushed (1 for a top-level region)
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Ordered open regions of one execution context
#[derive(Debug, Clone, Default)]
pub struct RegionStack {
    root_label: String,
    frames: Vec<RegionFrame>,
}

impl RegionStack {
    /// Empty stack; `root_label` only decorates displayed paths
    pub fn new(root_label: impl Into<String>) -> Self {
        Self {
            root_label: root_label.into(),
            frames: Vec::new(),
        }
    }

    /// Push a frame; always succeeds
    pub fn enter(&mut self, label: impl Into<String>, entry: Sample) -> FrameToken {
        self.frames.push(RegionFrame {
            label: label.into(),
            entry,
        });
        FrameToken {
            depth: self.frames.len(),
        }
    }

    /// Labels of all open frames, most recent last
    pub fn current_path(&self) -> PathKey {
        self.frames.iter().map(|frame| frame.label.as_str()).collect()
    }

    /// Pop the frame created by the `enter` call that returned `token`
    ///
    /// # Preconditions
    /// `token` must belong to the top frame. Returns `None` only when the
    /// stack is already empty, which is itself a pairing error.
    pub fn exit(&mut self, token: FrameToken) -> Option<RegionFrame> {
        debug_assert_eq!(
            token.depth,
            self.frames.len(),
            "region exited out of order (stack depth {}, frame depth {})",
            self.frames.len(),
            token.depth
        );
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn root_label(&self) -> &str {
        &self.root_label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sample() -> Sample {
        Sample {
            at: Duration::ZERO,
            memory: None,
            collection: None,
        }
    }

    #[test]
    fn test_nested_paths() {
        let mut stack = RegionStack::default();
        let outer = stack.enter("foo", sample());
        assert_eq!(stack.current_path(), PathKey::from_labels(["foo"]));

        let inner = stack.enter("bar", sample());
        assert_eq!(stack.current_path(), PathKey::from_labels(["foo", "bar"]));
        assert_eq!(inner.depth(), 2);

        assert_eq!(stack.exit(inner).unwrap().label, "bar");
        assert_eq!(stack.current_path(), PathKey::from_labels(["foo"]));
        assert_eq!(stack.exit(outer).unwrap().label, "foo");
        assert!(stack.is_empty());
    }

    #[test]
    fn test_recursion_grows_path() {
        let mut stack = RegionStack::default();
        let tokens: Vec<_> = (0..3).map(|_| stack.enter("foo", sample())).collect();
        assert_eq!(stack.current_path().to_string(), "foo > foo > foo");

        for token in tokens.into_iter().rev() {
            assert_eq!(stack.current_path().depth(), token.depth());
            stack.exit(token).unwrap();
        }
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_root_label_not_part_of_path() {
        let mut stack = RegionStack::new("Thread worker");
        let token = stack.enter("job", sample());
        assert_eq!(stack.root_label(), "Thread worker");
        assert_eq!(stack.current_path(), PathKey::from_labels(["job"]));
        stack.exit(token).unwrap();
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "out of order")]
    fn test_out_of_order_exit_fails_fast() {
        let mut stack = RegionStack::default();
        let outer = stack.enter("foo", sample());
        let _inner = stack.enter("bar", sample());
        let _ = stack.exit(outer);
    }
}
