/*!
 * Simulation Types
 * Run options, step outcomes, and the end-of-run report
 */

use crate::core::types::{Pid, SimTime};
use crate::memory::MemorySnapshot;
use crate::process::ProcessInfo;
use crate::scheduler::SchedulingPolicy;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What the driver does with processes denied memory at admission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionRetry {
    /// Stay blocked for the whole run and be reported as starved
    #[default]
    Never,
    /// Retry in pid order at the top of every scheduling cycle
    Periodic,
}

impl AdmissionRetry {
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Periodic => "periodic",
        }
    }
}

impl FromStr for AdmissionRetry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "never" | "none" | "off" => Ok(Self::Never),
            "periodic" | "retry" => Ok(Self::Periodic),
            _ => Err(format!(
                "Invalid admission retry '{}'. Valid: never, periodic",
                s
            )),
        }
    }
}

/// How one dispatch of a process ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Remaining time reached zero
    Terminated,
    /// Round-robin slice used up with work left
    QuantumExpired { remaining: SimTime },
    /// Process asked for the device and gave up the CPU
    BlockedOnIo,
}

/// Consistent view of the engine for observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub processes: Vec<ProcessInfo>,
    pub memory: MemorySnapshot,
}

/// Summary returned when a run finishes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub run_id: String,
    pub policy: SchedulingPolicy,
    /// Terminated processes in completion order
    pub terminated: Vec<Pid>,
    /// Processes still blocked on memory when the run ended
    pub starved: Vec<Pid>,
    pub dispatches: u64,
    /// Ticks consumed across all processes
    pub ticks: u64,
    pub io_requests: u64,
    /// Frame pool after final deallocation
    pub memory: MemorySnapshot,
}

impl SimulationReport {
    #[inline]
    pub fn all_terminated(&self) -> bool {
        self.starved.is_empty()
    }
}
