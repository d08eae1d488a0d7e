/*!
 * Process Table
 * Identity owner for all simulated processes
 */

use super::entity::Process;
use super::types::{ProcessError, ProcessInfo, ProcessResult, ProcessState, TickOutcome};
use crate::core::types::{Pid, Priority, SimTime};
use crate::monitoring::{Category, Collector, Payload, Severity};
use ahash::RandomState;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Concurrent process table
///
/// Cloning is cheap and shares the same table. Every state change goes
/// through `transition`, `tick` or `with_mut` so observers are notified.
pub struct ProcessTable {
    processes: Arc<DashMap<Pid, Process, RandomState>>,
    next_pid: Arc<AtomicU32>,
    collector: Option<Arc<Collector>>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self {
            processes: Arc::new(DashMap::with_hasher(RandomState::new())),
            next_pid: Arc::new(AtomicU32::new(1)),
            collector: None,
        }
    }

    /// Add observability collector
    pub fn with_collector(mut self, collector: Arc<Collector>) -> Self {
        self.collector = Some(collector);
        self
    }

    /// Create a process in `New` and return its id
    pub fn spawn(&self, priority: Priority, burst: SimTime) -> Pid {
        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
        let process = Process::new(pid, priority, burst);
        let burst = process.burst();
        self.processes.insert(pid, process);

        if let Some(ref collector) = self.collector {
            collector.emit_for(
                pid,
                Severity::Debug,
                Category::Process,
                Payload::ProcessCreated { priority, burst },
            );
        }
        debug!(pid, priority, burst, "Process created");
        pid
    }

    pub fn get(&self, pid: Pid) -> Option<ProcessInfo> {
        self.processes.get(&pid).map(|p| p.info())
    }

    pub fn state(&self, pid: Pid) -> Option<ProcessState> {
        self.processes.get(&pid).map(|p| p.state())
    }

    /// Human-readable one-line description
    pub fn describe(&self, pid: Pid) -> Option<String> {
        self.processes.get(&pid).map(|p| p.to_string())
    }

    /// Run `f` with exclusive access to one process
    ///
    /// The shard stays locked while `f` runs; `f` must not call back into
    /// this table.
    pub fn with_mut<R>(&self, pid: Pid, f: impl FnOnce(&mut Process) -> R) -> ProcessResult<R> {
        let mut entry = self
            .processes
            .get_mut(&pid)
            .ok_or(ProcessError::NotFound(pid))?;
        Ok(f(entry.value_mut()))
    }

    /// Move a process to `to`, returning the previous state
    pub fn transition(&self, pid: Pid, to: ProcessState) -> ProcessResult<ProcessState> {
        let from = self.with_mut(pid, |p| p.transition(to))??;
        if from != to {
            self.notify_state_change(pid, from, to);
        }
        Ok(from)
    }

    /// Advance a running process by one tick
    pub fn tick(&self, pid: Pid, delta: SimTime) -> ProcessResult<TickOutcome> {
        let outcome = self.with_mut(pid, |p| p.tick(delta))??;
        let remaining = match outcome {
            TickOutcome::Continue(remaining) => remaining,
            TickOutcome::Finished => 0.0,
        };

        if let Some(ref collector) = self.collector {
            collector.emit_for(
                pid,
                Severity::Trace,
                Category::Process,
                Payload::ProcessTick { remaining },
            );
        }
        if outcome == TickOutcome::Finished {
            self.notify_state_change(pid, ProcessState::Running, ProcessState::Terminated);
        }
        Ok(outcome)
    }

    fn notify_state_change(&self, pid: Pid, from: ProcessState, to: ProcessState) {
        if let Some(ref collector) = self.collector {
            collector.emit_for(
                pid,
                Severity::Info,
                Category::Process,
                Payload::ProcessStateChanged { from, to },
            );
        }
        debug!(pid, %from, %to, "Process state changed");
    }

    /// All process ids in ascending order
    pub fn pids(&self) -> Vec<Pid> {
        let mut pids: Vec<Pid> = self.processes.iter().map(|e| *e.key()).collect();
        pids.sort_unstable();
        pids
    }

    /// Ids of processes currently in `state`, ascending
    pub fn pids_in(&self, state: ProcessState) -> Vec<Pid> {
        let mut pids: Vec<Pid> = self
            .processes
            .iter()
            .filter(|e| e.value().state() == state)
            .map(|e| *e.key())
            .collect();
        pids.sort_unstable();
        pids
    }

    /// Snapshot of every process, ordered by pid
    pub fn snapshot(&self) -> Vec<ProcessInfo> {
        let mut infos: Vec<ProcessInfo> = self.processes.iter().map(|e| e.value().info()).collect();
        infos.sort_unstable_by_key(|info| info.pid);
        infos
    }

    /// Ticks consumed across all processes
    pub fn total_ticks(&self) -> u64 {
        self.processes.iter().map(|e| e.value().ticks()).sum()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}

impl Clone for ProcessTable {
    fn clone(&self) -> Self {
        Self {
            processes: Arc::clone(&self.processes),
            next_pid: Arc::clone(&self.next_pid),
            collector: self.collector.as_ref().map(Arc::clone),
        }
    }
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}
