/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type
pub type Pid = u32;

/// Priority level (informational under the built-in policies)
pub type Priority = u8;

/// Index of a physical frame in the memory pool
pub type FrameIndex = usize;

/// Simulated CPU time in seconds
pub type SimTime = f64;

/// Common result type for simulator operations
pub type SimResult<T> = Result<T, super::errors::SimError>;
