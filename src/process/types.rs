/*!
 * Process Types
 * Common types for process management
 */

use crate::core::types::{Pid, Priority, SimTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Process operation result
///
/// # Must Use
/// Process operations can fail and must be handled to keep states consistent
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Process errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessError {
    #[error("Process not found: {0}")]
    NotFound(Pid),

    #[error("Invalid state transition for process {pid}: {from} -> {to}")]
    InvalidStateTransition {
        pid: Pid,
        from: ProcessState,
        to: ProcessState,
    },

    #[error("Process {pid} is not running (state: {state})")]
    NotRunning { pid: Pid, state: ProcessState },
}

/// Why a process is blocked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    /// Denied frames at admission; never retried unless configured
    Memory,
    /// Occupying the simulated device
    Io,
}

/// Process lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Just constructed, no memory yet
    New,
    /// Holds memory and waits in the ready queue
    Ready,
    /// Owns the CPU
    Running,
    /// Waiting on memory or I/O
    Blocked(BlockReason),
    /// Remaining time reached zero (absorbing)
    Terminated,
}

impl ProcessState {
    /// Check whether the lifecycle allows moving to `to`
    #[must_use]
    pub const fn can_transition_to(self, to: ProcessState) -> bool {
        use ProcessState::*;
        matches!(
            (self, to),
            (New, Ready)
                | (New, Blocked(BlockReason::Memory))
                | (Ready, Ready)
                | (Ready, Running)
                | (Running, Ready)
                | (Running, Terminated)
                | (Running, Blocked(BlockReason::Io))
                | (Blocked(_), Ready)
        )
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_terminated(self) -> bool {
        matches!(self, ProcessState::Terminated)
    }

    /// Label shown in the process table
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ProcessState::New => "New",
            ProcessState::Ready => "Ready",
            ProcessState::Running => "Running",
            ProcessState::Blocked(_) => "Blocked",
            ProcessState::Terminated => "Terminated",
        }
    }
}

impl std::fmt::Display for ProcessState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ProcessState::Blocked(BlockReason::Memory) => write!(f, "Blocked(memory)"),
            ProcessState::Blocked(BlockReason::Io) => write!(f, "Blocked(io)"),
            other => write!(f, "{}", other.label()),
        }
    }
}

/// Result of advancing a running process by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Work remains; carries the new remaining time
    Continue(SimTime),
    /// Remaining time reached zero and the process terminated
    Finished,
}

/// Process snapshot handed to observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessInfo {
    pub pid: Pid,
    pub priority: Priority,
    pub remaining: SimTime,
    pub state: ProcessState,
}

impl ProcessInfo {
    #[inline(always)]
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, ProcessState::Running)
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        matches!(self.state, ProcessState::Terminated)
    }
}
