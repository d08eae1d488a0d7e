/*!
 * Memory Management
 *
 * Fixed pool of equally-sized frames handed out to processes.
 *
 * ## Allocation
 *
 * - All-or-nothing: a request either receives every frame it asked for or
 *   leaves the pool untouched
 * - Lowest-index-first: frames come from the bottom of the free set, so a
 *   freed frame is the first to be reused
 * - One entry per process: a process that already holds frames is refused
 *
 * ## Observability
 *
 * Every completed mutation is published on the collector after the lock is
 * released. Pressure is logged when usage crosses 60/80/95%.
 */

mod allocator;
mod frames;

use super::traits::{FrameAllocator, MemoryInfo};
use super::types::{MemoryResult, MemorySnapshot, MemoryStats};
use crate::core::types::{FrameIndex, Pid};
use crate::monitoring::Collector;
use frames::FrameTable;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Memory manager
///
/// Cloning shares the same pool.
pub struct MemoryManager {
    frames: Arc<Mutex<FrameTable>>,
    allocations: Arc<AtomicU64>,
    deallocations: Arc<AtomicU64>,
    denied: Arc<AtomicU64>,
    // Observability collector for event streaming
    collector: Option<Arc<Collector>>,
}

impl MemoryManager {
    /// Create a manager owning frames `0..total_frames`
    pub fn new(total_frames: usize) -> Self {
        info!(total_frames, "Memory manager initialized");
        Self {
            frames: Arc::new(Mutex::new(FrameTable::new(total_frames))),
            allocations: Arc::new(AtomicU64::new(0)),
            deallocations: Arc::new(AtomicU64::new(0)),
            denied: Arc::new(AtomicU64::new(0)),
            collector: None,
        }
    }

    /// Add observability collector
    pub fn with_collector(mut self, collector: Arc<Collector>) -> Self {
        self.collector = Some(collector);
        self
    }

    #[inline]
    pub fn total_frames(&self) -> usize {
        self.frames.lock().total()
    }

    #[inline]
    pub fn free_count(&self) -> usize {
        self.frames.lock().free_count()
    }

    /// Whether `pid` currently has a page-table entry
    #[inline]
    pub fn holds_memory(&self, pid: Pid) -> bool {
        self.frames.lock().holds(pid)
    }

    pub fn frames_of(&self, pid: Pid) -> Option<Vec<FrameIndex>> {
        self.frames.lock().frames_of(pid)
    }

    pub fn snapshot(&self) -> MemorySnapshot {
        self.frames.lock().snapshot()
    }

    pub fn stats(&self) -> MemoryStats {
        let (total, free, resident) = {
            let frames = self.frames.lock();
            (frames.total(), frames.free_count(), frames.resident())
        };
        let used = total - free;
        let usage_percentage = if total == 0 {
            0.0
        } else {
            (used as f64 / total as f64) * 100.0
        };

        MemoryStats {
            total_frames: total,
            used_frames: used,
            free_frames: free,
            usage_percentage,
            resident_processes: resident,
            allocations: self.allocations.load(Ordering::Relaxed),
            deallocations: self.deallocations.load(Ordering::Relaxed),
            denied: self.denied.load(Ordering::Relaxed),
        }
    }

    /// Verify the free set and page table partition the pool
    pub fn check_invariants(&self) -> MemoryResult<()> {
        self.frames.lock().check()
    }
}

impl Clone for MemoryManager {
    fn clone(&self) -> Self {
        Self {
            frames: Arc::clone(&self.frames),
            allocations: Arc::clone(&self.allocations),
            deallocations: Arc::clone(&self.deallocations),
            denied: Arc::clone(&self.denied),
            collector: self.collector.as_ref().map(Arc::clone),
        }
    }
}

impl Default for MemoryManager {
    fn default() -> Self {
        Self::new(crate::core::limits::DEFAULT_TOTAL_FRAMES)
    }
}

impl FrameAllocator for MemoryManager {
    fn allocate(&self, pid: Pid, count: usize) -> MemoryResult<Vec<FrameIndex>> {
        MemoryManager::allocate(self, pid, count)
    }

    fn deallocate(&self, pid: Pid) -> Vec<FrameIndex> {
        MemoryManager::deallocate(self, pid)
    }
}

impl MemoryInfo for MemoryManager {
    fn stats(&self) -> MemoryStats {
        MemoryManager::stats(self)
    }

    fn snapshot(&self) -> MemorySnapshot {
        MemoryManager::snapshot(self)
    }

    fn frames_of(&self, pid: Pid) -> Option<Vec<FrameIndex>> {
        MemoryManager::frames_of(self, pid)
    }
}
