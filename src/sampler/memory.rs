//! Process memory introspection.
//!
//! Probes report resident memory in bytes, or `None` when the platform
//! gives no answer. A probe never fails a measurement.

use log::debug;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use sysinfo::{Pid, ProcessesToUpdate, System};

/// Injected capability that reads process memory usage
pub trait MemoryProbe: Send + Sync {
    /// Current process memory in bytes; `None` when unavailable
    fn read_process_memory_bytes(&self) -> Option<u64>;

    /// Release reclaimable memory before a reading, if the probe knows how.
    ///
    /// Called only for regions that ask for a collection pass; its wall
    /// time is reported separately from the region's elapsed time.
    fn collect(&self) {}
}

/// Resident set size of the current process, read through `sysinfo`
///
/// There is no garbage collector to drive here, so `collect()` stays a
/// no-op and a collection pass reports `0.0s`. The pass is a hook for
/// injected probes backed by an allocator or runtime that can release
/// memory on demand.
pub struct ProcessMemoryProbe {
    pid: Pid,
    system: Mutex<System>,
}

impl ProcessMemoryProbe {
    pub fn new() -> Self {
        Self {
            pid: Pid::from_u32(std::process::id()),
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for ProcessMemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProcessMemoryProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessMemoryProbe")
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

impl MemoryProbe for ProcessMemoryProbe {
    fn read_process_memory_bytes(&self) -> Option<u64> {
        let mut system = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        system.refresh_processes(ProcessesToUpdate::Some(&[self.pid]), true);
        match system.process(self.pid) {
            Some(process) => Some(process.memory()),
            None => {
                debug!("Process {} not found, memory unavailable", self.pid);
                None
            }
        }
    }
}

/// Probe for platforms or configurations without memory readings
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMemoryProbe;

impl MemoryProbe for NullMemoryProbe {
    fn read_process_memory_bytes(&self) -> Option<u64> {
        None
    }
}
