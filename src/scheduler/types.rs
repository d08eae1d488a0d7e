/*!
 * Scheduler Types
 * Domain types for scheduling decisions
 */

use crate::core::types::{Pid, SimTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// Scheduler operation result
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Scheduler errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("CPU busy: process {0} is still running")]
    CpuBusy(Pid),

    #[error("Invalid quantum {0}: must be a positive number of seconds")]
    InvalidQuantum(SimTime),
}

/// Process selection policy, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulingPolicy {
    /// Strict FIFO
    Fcfs,
    /// Shortest remaining time first, non-preemptive
    Sjf,
    /// FIFO with a fixed time slice
    RoundRobin,
}

impl SchedulingPolicy {
    /// Convert to string representation
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fcfs => "fcfs",
            Self::Sjf => "sjf",
            Self::RoundRobin => "round_robin",
        }
    }

    /// Whether dispatches under this policy carry a time slice
    #[inline(always)]
    #[must_use]
    pub const fn is_preemptive(&self) -> bool {
        matches!(self, Self::RoundRobin)
    }
}

impl FromStr for SchedulingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fcfs" | "fifo" => Ok(Self::Fcfs),
            "sjf" => Ok(Self::Sjf),
            "round_robin" | "roundrobin" | "rr" => Ok(Self::RoundRobin),
            _ => Err(format!(
                "Invalid policy '{}'. Valid: fcfs, sjf, round_robin",
                s
            )),
        }
    }
}

impl std::fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SchedulingPolicy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SchedulingPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Round-robin time slice in simulated seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeQuantum {
    secs: SimTime,
}

impl TimeQuantum {
    pub fn new(secs: SimTime) -> SchedulerResult<Self> {
        if !(secs.is_finite() && secs > 0.0) {
            return Err(SchedulerError::InvalidQuantum(secs));
        }
        Ok(Self { secs })
    }

    #[inline(always)]
    pub const fn as_secs(&self) -> SimTime {
        self.secs
    }
}

impl Default for TimeQuantum {
    fn default() -> Self {
        Self {
            secs: crate::core::limits::DEFAULT_QUANTUM,
        }
    }
}

/// Outcome of offering a process to the ready queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Admission {
    /// Queued and moved to Ready
    Admitted,
    /// Blocked processes never enter the ready queue
    RejectedBlocked,
    RejectedTerminated,
    /// Already queued or currently running
    AlreadyQueued,
}

impl Admission {
    #[inline(always)]
    pub const fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// How long the selected process may run
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeSlice {
    /// Run until remaining time reaches zero
    ToCompletion,
    /// Run for at most this many simulated seconds, then requeue if unfinished
    Quantum(SimTime),
}

/// Dispatch decision returned by `select_next`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dispatch {
    pub pid: Pid,
    pub slice: TimeSlice,
}

impl Dispatch {
    /// Whether the caller must `requeue` the process when its slice ends early
    #[inline(always)]
    pub const fn requeue_if_unfinished(&self) -> bool {
        matches!(self.slice, TimeSlice::Quantum(_))
    }

    /// Ticks of `tick` seconds the slice allows; `None` means unbounded
    pub fn tick_budget(&self, tick: SimTime) -> Option<u64> {
        match self.slice {
            TimeSlice::ToCompletion => None,
            TimeSlice::Quantum(q) => Some(((q / tick).round() as u64).max(1)),
        }
    }

    /// Slice length for events, `None` for run-to-completion
    #[inline]
    pub fn quantum(&self) -> Option<SimTime> {
        match self.slice {
            TimeSlice::ToCompletion => None,
            TimeSlice::Quantum(q) => Some(q),
        }
    }
}

/// Result of `preempt_and_select`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Switch {
    /// Process moved from the CPU to the back of the queue
    pub preempted: Option<Pid>,
    pub next: Option<Dispatch>,
}

/// Scheduler statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerStats {
    pub total_scheduled: u64,
    pub context_switches: u64,
    pub preemptions: u64,
    pub admitted: u64,
    pub rejected: u64,
    pub policy: SchedulingPolicy,
    pub quantum: SimTime,
}
