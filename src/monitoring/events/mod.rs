/*!
 * Event System
 * Strongly-typed simulation events that observers drain after each mutation
 */

use crate::core::types::{FrameIndex, Pid, Priority, SimTime};
use crate::process::ProcessState;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Event severity for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Severity {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

/// Event category for organization and querying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Category {
    Process,
    Memory,
    Scheduler,
    Io,
    Simulation,
}

/// Unified event type - all observer notifications flow through this
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic timestamp (nanoseconds since the first event)
    pub timestamp_ns: u64,
    pub severity: Severity,
    pub category: Category,
    /// Process ID if applicable
    pub pid: Option<Pid>,
    pub payload: Payload,
}

/// Event payload - one variant per observable engine mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    // Process events
    ProcessCreated {
        priority: Priority,
        burst: SimTime,
    },
    ProcessStateChanged {
        from: ProcessState,
        to: ProcessState,
    },
    ProcessTick {
        remaining: SimTime,
    },

    // Memory events
    MemoryAllocated {
        frames: Vec<FrameIndex>,
    },
    MemoryFreed {
        frames: Vec<FrameIndex>,
    },
    AllocationDenied {
        requested: usize,
        available: usize,
    },

    // Scheduler events
    ProcessAdmitted {
        queue_len: usize,
    },
    ProcessDispatched {
        quantum: Option<SimTime>,
    },
    ProcessRequeued {
        remaining: SimTime,
    },

    // I/O events
    IoStarted {
        service_ms: u64,
    },
    IoCompleted {
        service_ms: u64,
    },

    // Run events
    SimulationComplete {
        terminated: usize,
        starved: usize,
    },
}

impl Event {
    /// Create a new event with current timestamp
    #[inline]
    pub fn new(severity: Severity, category: Category, payload: Payload) -> Self {
        Self {
            timestamp_ns: Self::now_ns(),
            severity,
            category,
            pid: None,
            payload,
        }
    }

    /// Create event with process context
    #[inline]
    pub fn with_pid(mut self, pid: Pid) -> Self {
        self.pid = Some(pid);
        self
    }

    #[inline]
    fn now_ns() -> u64 {
        static START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
        let start = START.get_or_init(Instant::now);
        start.elapsed().as_nanos() as u64
    }

    /// Get event age
    #[inline]
    pub fn age(&self) -> Duration {
        Duration::from_nanos(Self::now_ns().saturating_sub(self.timestamp_ns))
    }

    /// Check if event matches filter criteria
    #[inline]
    pub fn matches(&self, filter: &EventFilter) -> bool {
        if let Some(min_severity) = filter.min_severity {
            if self.severity < min_severity {
                return false;
            }
        }

        if let Some(category) = filter.category {
            if self.category != category {
                return false;
            }
        }

        if let Some(pid) = filter.pid {
            if self.pid != Some(pid) {
                return false;
            }
        }

        true
    }
}

/// Event filter for querying
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub min_severity: Option<Severity>,
    pub category: Option<Category>,
    pub pid: Option<Pid>,
}

impl EventFilter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.min_severity = Some(severity);
        self
    }

    #[inline]
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    #[inline]
    pub fn pid(mut self, pid: Pid) -> Self {
        self.pid = Some(pid);
        self
    }
}
