//! Registry of region stacks, one per execution context.
//!
//! Contexts are looked up by an explicit identifier rather than through
//! thread-local storage, so cooperative task runtimes can bring their own
//! ids. Entries are created on first use and never removed.

use super::stack::RegionStack;
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread::{self, ThreadId};

/// Opaque identifier of a logical thread of control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExecutionContextId(ContextKind);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ContextKind {
    Thread(ThreadId),
    Task(u64),
}

impl ExecutionContextId {
    /// Context of the calling OS thread
    pub fn current_thread() -> Self {
        Self(ContextKind::Thread(thread::current().id()))
    }

    /// Caller-assigned context, e.g. a task id from an async runtime
    pub fn task(id: u64) -> Self {
        Self(ContextKind::Task(id))
    }
}

impl fmt::Display for ExecutionContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            ContextKind::Thread(id) => write!(f, "thread {:?}", id),
            ContextKind::Task(id) => write!(f, "task {}", id),
        }
    }
}

/// Region stack shared between the registry and its owning context.
///
/// Only the owning context ever locks it, so the lock is uncontended.
pub type SharedStack = Arc<Mutex<RegionStack>>;

/// Maps execution contexts to their region stacks
#[derive(Debug, Default)]
pub struct ContextRegistry {
    stacks: RwLock<HashMap<ExecutionContextId, SharedStack>>,
}

impl ContextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack for `context`, created empty on first use
    pub fn stack_for(&self, context: ExecutionContextId) -> SharedStack {
        self.stack_for_with_root(context, String::new)
    }

    /// Like `stack_for`, naming the root label if the stack is new
    pub fn stack_for_with_root<F>(&self, context: ExecutionContextId, root_label: F) -> SharedStack
    where
        F: FnOnce() -> String,
    {
        if let Some(stack) = self
            .stacks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&context)
        {
            return Arc::clone(stack);
        }

        let mut stacks = self.stacks.write().unwrap_or_else(PoisonError::into_inner);
        let stack = stacks.entry(context).or_insert_with(|| {
            let root = root_label();
            debug!("New region stack for {} (root label {:?})", context, root);
            Arc::new(Mutex::new(RegionStack::new(root)))
        });
        Arc::clone(stack)
    }

    /// Stack of the calling thread
    ///
    /// Threads other than `main` get a `Thread <name>` root label.
    pub fn stack_for_current_thread(&self) -> (ExecutionContextId, SharedStack) {
        let context = ExecutionContextId::current_thread();
        let stack = self.stack_for_with_root(context, thread_root_label);
        (context, stack)
    }

    /// Number of contexts seen so far
    pub fn context_count(&self) -> usize {
        self.stacks.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

fn thread_root_label() -> String {
    let current = thread::current();
    match current.name() {
        Some("main") => String::new(),
        Some(name) => format!("Thread {}", name),
        None => format!("Thread {:?}", current.id()),
    }
}
