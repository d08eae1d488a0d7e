/*!
 * Scheduler Entry Types
 * Internal data structures for ready-queue entries
 */

use crate::core::types::{Pid, Priority, SimTime};
use std::cmp::Ordering;

/// Ready-queue entry
#[derive(Debug, Clone)]
pub(super) struct Entry {
    pub pid: Pid,
    pub priority: Priority,
    /// Remaining time when the process was (re)admitted
    pub remaining: SimTime,
    /// Admission sequence number, unique and increasing
    pub seq: u64,
}

impl Entry {
    pub fn new(pid: Pid, priority: Priority, remaining: SimTime, seq: u64) -> Self {
        Self {
            pid,
            priority,
            remaining,
            seq,
        }
    }

    /// Shortest-job ordering: remaining time, then admission order
    #[inline]
    pub fn shortest_first(&self, other: &Self) -> Ordering {
        self.remaining
            .total_cmp(&other.remaining)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.pid == other.pid
    }
}

impl Eq for Entry {}
