/*!
 * Process Module
 * Process lifecycle, the process table, and state transitions
 */

pub mod entity;
pub mod table;
pub mod types;

// Re-export for convenience
pub use entity::Process;
pub use table::ProcessTable;
pub use types::{BlockReason, ProcessError, ProcessInfo, ProcessResult, ProcessState, TickOutcome};
