/*!
 * Memory Types
 * Common types for frame management
 */

use crate::core::limits::{
    MEMORY_CRITICAL_THRESHOLD, MEMORY_MEDIUM_THRESHOLD, MEMORY_WARNING_THRESHOLD,
};
use crate::core::types::{FrameIndex, Pid};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Memory operation result
///
/// # Must Use
/// A denied allocation leaves the process without frames; callers must branch
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("Not enough memory: requested {requested} frames, {available} free of {total}")]
    InsufficientFrames {
        requested: usize,
        available: usize,
        total: usize,
    },

    #[error("Process {0} already holds frames")]
    AlreadyAllocated(Pid),

    #[error("Frame accounting corrupted: {0}")]
    InvariantViolation(String),
}

/// Point-in-time copy of the frame pool for observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub total_frames: usize,
    pub free: BTreeSet<FrameIndex>,
    pub page_table: BTreeMap<Pid, Vec<FrameIndex>>,
}

impl MemorySnapshot {
    #[inline]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn used_count(&self) -> usize {
        self.total_frames - self.free.len()
    }

    #[inline]
    pub fn is_free(&self, frame: FrameIndex) -> bool {
        self.free.contains(&frame)
    }

    /// Process holding `frame`, if any
    pub fn owner_of(&self, frame: FrameIndex) -> Option<Pid> {
        self.page_table
            .iter()
            .find(|(_, frames)| frames.contains(&frame))
            .map(|(pid, _)| *pid)
    }
}

/// Memory statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_frames: usize,
    pub used_frames: usize,
    pub free_frames: usize,
    pub usage_percentage: f64,
    pub resident_processes: usize,
    pub allocations: u64,
    pub deallocations: u64,
    pub denied: u64,
}

impl MemoryStats {
    pub fn memory_pressure(&self) -> MemoryPressure {
        MemoryPressure::from_ratio(self.usage_percentage / 100.0)
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl MemoryPressure {
    /// Classify a used/total ratio in `[0, 1]`
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= MEMORY_CRITICAL_THRESHOLD {
            MemoryPressure::Critical
        } else if ratio >= MEMORY_WARNING_THRESHOLD {
            MemoryPressure::High
        } else if ratio >= MEMORY_MEDIUM_THRESHOLD {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

impl std::fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}
