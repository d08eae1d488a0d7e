/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use miette::Diagnostic;
use thiserror::Error;

// Re-export subsystem errors so callers only need one import
pub use crate::core::config::ConfigError;
pub use crate::io::IoError;
pub use crate::memory::MemoryError;
pub use crate::process::ProcessError;
pub use crate::scheduler::SchedulerError;

/// Unified simulator error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum SimError {
    #[error("Memory error: {0}")]
    #[diagnostic(
        code(sim::memory),
        help("The frame pool rejected the request. Check total_frames and pages_per_process.")
    )]
    Memory(#[from] MemoryError),

    #[error("Process error: {0}")]
    #[diagnostic(
        code(sim::process),
        help("The process is unknown or the requested state transition is not allowed.")
    )]
    Process(#[from] ProcessError),

    #[error("Scheduler error: {0}")]
    #[diagnostic(
        code(sim::scheduler),
        help("Release or requeue the running process before selecting another one.")
    )]
    Scheduler(#[from] SchedulerError),

    #[error("I/O error: {0}")]
    #[diagnostic(
        code(sim::io),
        help("The simulated device could not service the request.")
    )]
    Io(#[from] IoError),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(sim::configuration),
        help("Review the SIM_* environment variables or the SIM_CONFIG file.")
    )]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    #[diagnostic(
        code(sim::internal),
        help("An execution context ended unexpectedly. Please report this issue.")
    )]
    Internal(String),
}

impl From<tokio::task::JoinError> for SimError {
    fn from(err: tokio::task::JoinError) -> Self {
        SimError::Internal(format!("task failed to complete: {}", err))
    }
}

impl From<String> for SimError {
    fn from(msg: String) -> Self {
        SimError::Internal(msg)
    }
}

impl From<&str> for SimError {
    fn from(msg: &str) -> Self {
        SimError::Internal(msg.to_string())
    }
}
