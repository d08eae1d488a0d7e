/*!
 * OS Resource Simulator Library
 * Scheduling, frame allocation, and blocking I/O for simulated processes
 */

pub mod core;
pub mod io;
pub mod memory;
pub mod monitoring;
pub mod process;
pub mod scheduler;
pub mod simulation;

// Re-exports
pub use crate::core::{ConfigError, SimError, SimResult, SimulationConfig};
pub use io::{IoError, IoManager};
pub use memory::{FrameAllocator, MemoryError, MemoryInfo, MemoryManager, MemorySnapshot, MemoryStats};
pub use monitoring::{init_tracing, Collector, Event, Payload};
pub use process::{BlockReason, Process, ProcessInfo, ProcessState, ProcessTable};
pub use scheduler::{Admission, Dispatch, Scheduler, SchedulingPolicy, TimeQuantum, TimeSlice};
pub use simulation::{
    AdmissionRetry, SimulationBuilder, SimulationContext, SimulationDriver, SimulationHandle,
    SimulationReport,
};
