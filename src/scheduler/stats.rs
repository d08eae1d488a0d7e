/*!
 * Scheduler Statistics
 * Read-only queries for observers
 */

use super::types::SchedulerStats;
use super::Scheduler;
use crate::core::types::Pid;

impl Scheduler {
    /// Get scheduler statistics (lock-free snapshot)
    pub fn stats(&self) -> SchedulerStats {
        self.stats.snapshot()
    }

    /// Process currently holding the CPU
    pub fn current(&self) -> Option<Pid> {
        self.queue.read().current.as_ref().map(|e| e.pid)
    }

    /// Queued process ids in queue order (excludes the running process)
    pub fn queued(&self) -> Vec<Pid> {
        self.queue.read().ready.iter().map(|e| e.pid).collect()
    }

    /// Whether `pid` is queued or running
    pub fn contains(&self, pid: Pid) -> bool {
        self.queue.read().contains(pid)
    }

    /// Number of processes waiting in the ready queue
    pub fn len(&self) -> usize {
        self.queue.read().ready.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.read().ready.is_empty()
    }
}
