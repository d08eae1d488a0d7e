/*!
 * Memory Traits
 * Frame management abstractions
 */

use super::types::*;
use crate::core::types::{FrameIndex, Pid};

/// Frame allocator interface
pub trait FrameAllocator: Send + Sync {
    /// Take `count` frames for a process, all or nothing
    fn allocate(&self, pid: Pid, count: usize) -> MemoryResult<Vec<FrameIndex>>;

    /// Return every frame a process holds; empty if it holds none
    fn deallocate(&self, pid: Pid) -> Vec<FrameIndex>;
}

/// Memory statistics provider
pub trait MemoryInfo: Send + Sync {
    /// Get overall memory statistics
    fn stats(&self) -> MemoryStats;

    /// Get a copy of the free set and page table
    fn snapshot(&self) -> MemorySnapshot;

    /// Frames assigned to a process, in assignment order
    fn frames_of(&self, pid: Pid) -> Option<Vec<FrameIndex>>;

    /// Get memory pressure level
    fn pressure(&self) -> MemoryPressure {
        self.stats().memory_pressure()
    }
}
