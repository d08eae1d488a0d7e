/*!
 * Memory Allocator Implementation
 * Allocation and deallocation logic
 */

use super::super::types::{MemoryError, MemoryPressure, MemoryResult};
use super::MemoryManager;
use crate::core::types::{FrameIndex, Pid};
use crate::monitoring::{Category, Payload, Severity};
use std::sync::atomic::Ordering;
use tracing::{debug, info, warn};

impl MemoryManager {
    /// Assign `count` frames to `pid`, lowest indices first
    ///
    /// A zero-frame request succeeds with no frames and creates no entry.
    pub fn allocate(&self, pid: Pid, count: usize) -> MemoryResult<Vec<FrameIndex>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let outcome = {
            let mut frames = self.frames.lock();
            if frames.holds(pid) {
                Err(MemoryError::AlreadyAllocated(pid))
            } else if frames.free_count() < count {
                Err(MemoryError::InsufficientFrames {
                    requested: count,
                    available: frames.free_count(),
                    total: frames.total(),
                })
            } else {
                let assigned = frames.assign_lowest(pid, count);
                Ok((assigned, frames.total() - frames.free_count(), frames.total()))
            }
        };

        match outcome {
            Ok((assigned, used, total)) => {
                self.allocations.fetch_add(1, Ordering::Relaxed);
                self.emit(
                    pid,
                    Severity::Debug,
                    Payload::MemoryAllocated {
                        frames: assigned.clone(),
                    },
                );

                if let Some(level) = self.check_memory_pressure(used, total) {
                    warn!(
                        pid,
                        frames = ?assigned,
                        used,
                        total,
                        "Memory pressure {}",
                        level
                    );
                } else {
                    info!(pid, frames = ?assigned, "Allocated frames");
                }
                Ok(assigned)
            }
            Err(MemoryError::InsufficientFrames {
                requested,
                available,
                total,
            }) => {
                self.denied.fetch_add(1, Ordering::Relaxed);
                self.emit(
                    pid,
                    Severity::Warn,
                    Payload::AllocationDenied {
                        requested,
                        available,
                    },
                );
                debug!(pid, requested, available, "Allocation denied");
                Err(MemoryError::InsufficientFrames {
                    requested,
                    available,
                    total,
                })
            }
            Err(err) => {
                warn!(pid, error = %err, "Allocation refused");
                Err(err)
            }
        }
    }

    /// Free every frame `pid` holds
    ///
    /// Returns the released frames; unknown or repeated calls release nothing.
    pub fn deallocate(&self, pid: Pid) -> Vec<FrameIndex> {
        let released = self.frames.lock().release(pid);
        if released.is_empty() {
            debug!(pid, "Deallocate: process holds no frames");
            return released;
        }

        self.deallocations.fetch_add(1, Ordering::Relaxed);
        self.emit(
            pid,
            Severity::Debug,
            Payload::MemoryFreed {
                frames: released.clone(),
            },
        );
        info!(pid, frames = ?released, "Freed frames");
        released
    }

    /// Free every outstanding allocation; returns how many frames were released
    pub fn deallocate_all(&self) -> usize {
        let drained = self.frames.lock().release_all();
        let mut count = 0;

        for (pid, frames) in drained {
            count += frames.len();
            self.deallocations.fetch_add(1, Ordering::Relaxed);
            self.emit(pid, Severity::Debug, Payload::MemoryFreed { frames });
        }

        if count > 0 {
            info!(frames = count, "Released all outstanding frames");
        }
        count
    }

    fn emit(&self, pid: Pid, severity: Severity, payload: Payload) {
        if let Some(ref collector) = self.collector {
            collector.emit_for(pid, severity, Category::Memory, payload);
        }
    }

    /// Pressure level when usage is at or above the medium threshold
    pub(super) fn check_memory_pressure(&self, used: usize, total: usize) -> Option<MemoryPressure> {
        if total == 0 {
            return None;
        }
        match MemoryPressure::from_ratio(used as f64 / total as f64) {
            MemoryPressure::Low => None,
            level => Some(level),
        }
    }
}
