//! Resident memory sampling through `sysinfo`.

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Samples the resident set size of one process.
pub struct MemoryProbe {
    system: System,
    pid: Pid,
}

impl MemoryProbe {
    pub fn for_pid(pid: u32) -> Self {
        Self {
            system: System::new(),
            pid: Pid::from_u32(pid),
        }
    }

    /// Probe for the calling process, if its pid can be determined.
    pub fn current() -> Option<Self> {
        match sysinfo::get_current_pid() {
            Ok(pid) => Some(Self {
                system: System::new(),
                pid,
            }),
            Err(e) => {
                tracing::debug!("cannot determine own pid: {e}");
                None
            }
        }
    }

    /// Current RSS in bytes; `None` once the process is gone.
    pub fn rss_bytes(&mut self) -> Option<u64> {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[self.pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        self.system.process(self.pid).map(|p| p.memory())
    }
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Growth between two samples in MB, never negative. Missing samples count
/// as no growth.
pub fn delta_mb(before: Option<u64>, after: Option<u64>) -> f64 {
    match (before, after) {
        (Some(before), Some(after)) => bytes_to_mb(after.saturating_sub(before)),
        _ => 0.0,
    }
}
