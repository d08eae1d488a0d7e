/*!
 * Lock-Free Scheduler Statistics
 * Atomic counters so observers never contend with the run queue lock
 */

use super::types::{SchedulerStats, SchedulingPolicy, TimeQuantum};
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic scheduler statistics
///
/// All counters use relaxed ordering; a snapshot may mix values from
/// concurrent updates but each value is accurate.
#[repr(C, align(64))]
pub(super) struct AtomicSchedulerStats {
    total_scheduled: AtomicU64,
    context_switches: AtomicU64,
    preemptions: AtomicU64,
    admitted: AtomicU64,
    rejected: AtomicU64,
    policy: SchedulingPolicy,
    quantum: TimeQuantum,
}

impl AtomicSchedulerStats {
    #[inline]
    pub fn new(policy: SchedulingPolicy, quantum: TimeQuantum) -> Self {
        Self {
            total_scheduled: AtomicU64::new(0),
            context_switches: AtomicU64::new(0),
            preemptions: AtomicU64::new(0),
            admitted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            policy,
            quantum,
        }
    }

    #[inline(always)]
    pub fn inc_scheduled(&self) {
        self.total_scheduled.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_context_switches(&self) {
        self.context_switches.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_preemptions(&self) {
        self.preemptions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_admitted(&self) {
        self.admitted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn snapshot(&self) -> SchedulerStats {
        SchedulerStats {
            total_scheduled: self.total_scheduled.load(Ordering::Relaxed),
            context_switches: self.context_switches.load(Ordering::Relaxed),
            preemptions: self.preemptions.load(Ordering::Relaxed),
            admitted: self.admitted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            policy: self.policy,
            quantum: self.quantum.as_secs(),
        }
    }
}
