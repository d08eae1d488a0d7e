/*!
 * Scheduler Core Operations
 * Admit, select, requeue, and release
 */

use super::entry::Entry;
use super::types::{Admission, Dispatch, SchedulerError, SchedulerResult, Switch};
use super::Scheduler;
use crate::core::types::{Pid, SimTime};
use crate::monitoring::{Category, Payload, Severity};
use crate::process::{Process, ProcessState};
use tracing::{debug, info};

impl Scheduler {
    /// Offer a process to the ready queue
    ///
    /// Only New or Ready processes that are not already queued or running
    /// are admitted; admission moves them to Ready. Rejected processes are
    /// left untouched.
    pub fn admit(&self, process: &mut Process) -> Admission {
        let pid = process.pid();
        let from = process.state();

        let admission = match from {
            ProcessState::Blocked(_) => Admission::RejectedBlocked,
            ProcessState::Terminated => Admission::RejectedTerminated,
            ProcessState::Running => Admission::AlreadyQueued,
            ProcessState::New | ProcessState::Ready => {
                let mut queue = self.queue.write();
                if queue.contains(pid) {
                    Admission::AlreadyQueued
                } else if process.transition(ProcessState::Ready).is_err() {
                    Admission::RejectedBlocked
                } else {
                    let seq = queue.next_seq();
                    queue.ready.push_back(Entry::new(
                        pid,
                        process.priority(),
                        process.remaining(),
                        seq,
                    ));
                    let queue_len = queue.ready.len();
                    drop(queue);

                    self.stats.inc_admitted();
                    if from != ProcessState::Ready {
                        self.emit(
                            pid,
                            Severity::Info,
                            Category::Process,
                            Payload::ProcessStateChanged {
                                from,
                                to: ProcessState::Ready,
                            },
                        );
                    }
                    self.emit(
                        pid,
                        Severity::Debug,
                        Category::Scheduler,
                        Payload::ProcessAdmitted { queue_len },
                    );
                    info!(pid, queue_len, "Process admitted to ready queue");
                    return Admission::Admitted;
                }
            }
        };

        self.stats.inc_rejected();
        debug!(pid, state = %from, ?admission, "Admission refused");
        admission
    }

    /// Pick the next process to run
    ///
    /// Returns `Ok(None)` when the queue is empty. Refuses while another
    /// process still holds the CPU; use `preempt_and_select` to replace it.
    pub fn select_next(&self) -> SchedulerResult<Option<Dispatch>> {
        let mut queue = self.queue.write();
        if let Some(ref running) = queue.current {
            return Err(SchedulerError::CpuBusy(running.pid));
        }
        Ok(self.dispatch_locked(&mut queue))
    }

    /// Move the running process to the back of the queue, then select
    pub fn preempt_and_select(&self) -> Switch {
        let mut queue = self.queue.write();
        let preempted = match queue.current.take() {
            Some(mut entry) => {
                entry.seq = queue.next_seq();
                let pid = entry.pid;
                queue.ready.push_back(entry);
                Some(pid)
            }
            None => None,
        };
        let next = self.dispatch_locked(&mut queue);
        drop(queue);

        if let Some(pid) = preempted {
            self.stats.inc_preemptions();
            debug!(pid, "Process preempted");
        }
        Switch { preempted, next }
    }

    fn dispatch_locked(&self, queue: &mut super::RunQueue) -> Option<Dispatch> {
        let entry = self.take_next(&mut queue.ready)?;
        let pid = entry.pid;
        debug!(pid, priority = entry.priority, remaining = entry.remaining, "Selected process");
        queue.current = Some(entry);

        if queue.last_dispatched.replace(pid).is_some() {
            self.stats.inc_context_switches();
        }
        self.stats.inc_scheduled();

        let dispatch = Dispatch {
            pid,
            slice: self.slice(),
        };
        self.emit(
            pid,
            Severity::Debug,
            Category::Scheduler,
            Payload::ProcessDispatched {
                quantum: dispatch.quantum(),
            },
        );
        Some(dispatch)
    }

    /// Put the running process at the back of the queue after its slice
    ///
    /// Returns false when `pid` is not the running process.
    pub fn requeue(&self, pid: Pid, remaining: SimTime) -> bool {
        let mut queue = self.queue.write();
        match queue.current.take() {
            Some(mut entry) if entry.pid == pid => {
                entry.remaining = remaining;
                entry.seq = queue.next_seq();
                queue.ready.push_back(entry);
            }
            other => {
                queue.current = other;
                return false;
            }
        }
        drop(queue);

        self.stats.inc_preemptions();
        self.emit(
            pid,
            Severity::Debug,
            Category::Scheduler,
            Payload::ProcessRequeued { remaining },
        );
        debug!(pid, remaining, "Process requeued");
        true
    }

    /// Clear the running slot after the process terminated or blocked
    pub fn release(&self, pid: Pid) -> bool {
        let mut queue = self.queue.write();
        if queue.current.as_ref().is_some_and(|e| e.pid == pid) {
            queue.current = None;
            true
        } else {
            false
        }
    }

    /// Drop a process from the queue or the CPU
    pub fn remove(&self, pid: Pid) -> bool {
        let mut queue = self.queue.write();
        if queue.current.as_ref().is_some_and(|e| e.pid == pid) {
            queue.current = None;
            return true;
        }
        match queue.ready.iter().position(|e| e.pid == pid) {
            Some(pos) => queue.ready.remove(pos).is_some(),
            None => false,
        }
    }

    fn emit(&self, pid: Pid, severity: Severity, category: Category, payload: Payload) {
        if let Some(ref collector) = self.collector {
            collector.emit_for(pid, severity, category, payload);
        }
    }
}
