/*!
 * Process Entity
 * Passive state holder for one simulated task
 */

use super::types::{ProcessError, ProcessInfo, ProcessResult, ProcessState, TickOutcome};
use crate::core::limits::REMAINING_EPSILON;
use crate::core::types::{Pid, Priority, SimTime};

/// One simulated task
#[derive(Debug, Clone)]
pub struct Process {
    pid: Pid,
    priority: Priority,
    burst: SimTime,
    remaining: SimTime,
    state: ProcessState,
    ticks: u64,
}

impl Process {
    /// Create a process in `New`; negative or NaN bursts become zero
    #[must_use]
    pub fn new(pid: Pid, priority: Priority, burst: SimTime) -> Self {
        let burst = if burst.is_finite() && burst > 0.0 {
            burst
        } else {
            0.0
        };
        Self {
            pid,
            priority,
            burst,
            remaining: burst,
            state: ProcessState::New,
            ticks: 0,
        }
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Burst time the process was created with
    #[inline]
    pub fn burst(&self) -> SimTime {
        self.burst
    }

    #[inline]
    pub fn remaining(&self) -> SimTime {
        self.remaining
    }

    #[inline]
    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Ticks consumed so far
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Move to `to`, returning the previous state
    pub fn transition(&mut self, to: ProcessState) -> ProcessResult<ProcessState> {
        let from = self.state;
        if !from.can_transition_to(to) {
            return Err(ProcessError::InvalidStateTransition {
                pid: self.pid,
                from,
                to,
            });
        }
        self.state = to;
        Ok(from)
    }

    /// Consume `delta` of CPU time
    ///
    /// The termination check runs after the decrement, and remaining time
    /// is clamped so it never goes negative. Residue left by repeated
    /// subtraction of the tick counts as done.
    pub fn tick(&mut self, delta: SimTime) -> ProcessResult<TickOutcome> {
        if self.state != ProcessState::Running {
            return Err(ProcessError::NotRunning {
                pid: self.pid,
                state: self.state,
            });
        }

        self.ticks += 1;
        let next = self.remaining - delta;
        if next <= REMAINING_EPSILON {
            self.remaining = 0.0;
            self.state = ProcessState::Terminated;
            Ok(TickOutcome::Finished)
        } else {
            self.remaining = next;
            Ok(TickOutcome::Continue(next))
        }
    }

    #[must_use]
    pub fn info(&self) -> ProcessInfo {
        ProcessInfo {
            pid: self.pid,
            priority: self.priority,
            remaining: self.remaining,
            state: self.state,
        }
    }
}

impl std::fmt::Display for Process {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Process(ID={}, Priority={}, Time={:.2}, State={})",
            self.pid, self.priority, self.remaining, self.state
        )
    }
}
