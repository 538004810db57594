//! Execution contexts and their region stacks.

pub mod registry;
pub mod stack;

pub use registry::{ContextRegistry, ExecutionContextId, SharedStack};
pub use stack::{FrameToken, RegionFrame, RegionStack};
