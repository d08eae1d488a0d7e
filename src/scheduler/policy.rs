/*!
 * Scheduler Policy
 * Per-policy removal from the ready queue and time-slice assignment
 */

use super::entry::Entry;
use super::types::{SchedulingPolicy, TimeSlice};
use super::Scheduler;
use std::collections::VecDeque;

impl Scheduler {
    /// Remove the next entry per the active policy
    ///
    /// FCFS and round-robin pop the front in O(1). SJF stable-sorts the
    /// whole queue by remaining time on every call, O(n log n), so equal
    /// remaining times keep admission order.
    pub(super) fn take_next(&self, ready: &mut VecDeque<Entry>) -> Option<Entry> {
        match self.policy {
            SchedulingPolicy::Fcfs | SchedulingPolicy::RoundRobin => ready.pop_front(),
            SchedulingPolicy::Sjf => {
                ready.make_contiguous().sort_by(Entry::shortest_first);
                ready.pop_front()
            }
        }
    }

    /// Slice handed out with every dispatch
    #[inline]
    pub(super) fn slice(&self) -> TimeSlice {
        if self.policy.is_preemptive() {
            TimeSlice::Quantum(self.quantum.as_secs())
        } else {
            TimeSlice::ToCompletion
        }
    }
}
