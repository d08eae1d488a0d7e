/*!
 * CPU Scheduler
 * Ready queue and process selection for a single simulated CPU
 */

mod atomic_stats;
mod entry;
mod operations;
mod policy;
mod stats;
pub mod types;

pub use types::{
    Admission, Dispatch, SchedulerError, SchedulerResult, SchedulerStats, SchedulingPolicy,
    Switch, TimeQuantum, TimeSlice,
};

use crate::core::types::Pid;
use crate::monitoring::Collector;
use atomic_stats::AtomicSchedulerStats;
use entry::Entry;
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::info;

/// Ready queue plus the running slot, guarded by one lock
///
/// A pid is in `ready` at most once and never while it is `current`.
#[derive(Debug, Default)]
struct RunQueue {
    ready: VecDeque<Entry>,
    current: Option<Entry>,
    last_dispatched: Option<Pid>,
    next_seq: u64,
}

impl RunQueue {
    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn contains(&self, pid: Pid) -> bool {
        self.current.as_ref().is_some_and(|e| e.pid == pid)
            || self.ready.iter().any(|e| e.pid == pid)
    }
}

/// CPU Scheduler
///
/// Holds process references by id; the process table owns the processes.
/// Cloning shares the same queue.
pub struct Scheduler {
    policy: SchedulingPolicy,
    quantum: TimeQuantum,

    queue: Arc<RwLock<RunQueue>>,

    // Statistics - lock-free atomics for hot path updates
    stats: Arc<AtomicSchedulerStats>,

    // Observability collector for event streaming
    collector: Option<Arc<Collector>>,
}

impl Scheduler {
    /// Create new scheduler with policy and the default quantum
    pub fn new(policy: SchedulingPolicy) -> Self {
        Self::with_quantum(policy, TimeQuantum::default())
    }

    /// Create scheduler with custom quantum
    pub fn with_quantum(policy: SchedulingPolicy, quantum: TimeQuantum) -> Self {
        info!(
            policy = policy.as_str(),
            quantum = quantum.as_secs(),
            "Scheduler initialized"
        );

        Self {
            policy,
            quantum,
            queue: Arc::new(RwLock::new(RunQueue::default())),
            stats: Arc::new(AtomicSchedulerStats::new(policy, quantum)),
            collector: None,
        }
    }

    /// Add observability collector
    pub fn with_collector(mut self, collector: Arc<Collector>) -> Self {
        self.collector = Some(collector);
        self
    }

    #[inline]
    pub fn policy(&self) -> SchedulingPolicy {
        self.policy
    }

    #[inline]
    pub fn quantum(&self) -> TimeQuantum {
        self.quantum
    }
}

impl Clone for Scheduler {
    fn clone(&self) -> Self {
        Self {
            policy: self.policy,
            quantum: self.quantum,
            queue: Arc::clone(&self.queue),
            stats: Arc::clone(&self.stats),
            collector: self.collector.as_ref().map(Arc::clone),
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulingPolicy::Fcfs)
    }
}
