/*!
 * I/O Types
 * Errors and request handles for the simulated device
 */

use crate::core::types::Pid;
use crate::process::ProcessError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// I/O operation result
pub type IoResult<T> = Result<T, IoError>;

/// I/O errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IoError {
    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("Invalid device service range: {min:?} exceeds {max:?}")]
    InvalidServiceRange { min: Duration, max: Duration },
}

/// An in-flight device request
///
/// Returned by `IoManager::begin` once the process is blocked and queued;
/// hand it to `IoManager::complete` to wait out the service time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct IoTicket {
    pub pid: Pid,
    pub service: Duration,
}

/// Device statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoStats {
    pub requests: u64,
    pub completions: u64,
    pub in_service: usize,
}
