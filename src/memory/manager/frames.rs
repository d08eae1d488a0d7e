/*!
 * Frame Table
 * Free set and page table guarded together by the manager's lock
 */

use super::super::types::{MemoryError, MemoryResult, MemorySnapshot};
use crate::core::types::{FrameIndex, Pid};
use std::collections::{BTreeMap, BTreeSet};

/// Frame bookkeeping
///
/// The free set and the union of page-table lists partition `0..total`.
/// Every mutation keeps that true before returning.
#[derive(Debug)]
pub(super) struct FrameTable {
    total: usize,
    free: BTreeSet<FrameIndex>,
    page_table: BTreeMap<Pid, Vec<FrameIndex>>,
}

impl FrameTable {
    pub(super) fn new(total: usize) -> Self {
        Self {
            total,
            free: (0..total).collect(),
            page_table: BTreeMap::new(),
        }
    }

    #[inline]
    pub(super) fn total(&self) -> usize {
        self.total
    }

    #[inline]
    pub(super) fn free_count(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub(super) fn resident(&self) -> usize {
        self.page_table.len()
    }

    #[inline]
    pub(super) fn holds(&self, pid: Pid) -> bool {
        self.page_table.contains_key(&pid)
    }

    pub(super) fn frames_of(&self, pid: Pid) -> Option<Vec<FrameIndex>> {
        self.page_table.get(&pid).cloned()
    }

    /// Move the `count` lowest free frames to `pid`
    ///
    /// Caller has already checked the pid has no entry and enough frames
    /// are free.
    pub(super) fn assign_lowest(&mut self, pid: Pid, count: usize) -> Vec<FrameIndex> {
        let frames: Vec<FrameIndex> = self.free.iter().take(count).copied().collect();
        for frame in &frames {
            self.free.remove(frame);
        }
        self.page_table.insert(pid, frames.clone());
        frames
    }

    /// Drop the page-table entry for `pid` and free its frames
    pub(super) fn release(&mut self, pid: Pid) -> Vec<FrameIndex> {
        match self.page_table.remove(&pid) {
            Some(frames) => {
                self.free.extend(frames.iter().copied());
                frames
            }
            None => Vec::new(),
        }
    }

    /// Release every entry, returning `(pid, frames)` in pid order
    pub(super) fn release_all(&mut self) -> Vec<(Pid, Vec<FrameIndex>)> {
        let drained = std::mem::take(&mut self.page_table);
        for frames in drained.values() {
            self.free.extend(frames.iter().copied());
        }
        drained.into_iter().collect()
    }

    pub(super) fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            total_frames: self.total,
            free: self.free.clone(),
            page_table: self.page_table.clone(),
        }
    }

    /// Verify the partition invariant
    pub(super) fn check(&self) -> MemoryResult<()> {
        let mut seen = vec![false; self.total];

        for &frame in &self.free {
            if frame >= self.total {
                return Err(MemoryError::InvariantViolation(format!(
                    "free frame {} out of range 0..{}",
                    frame, self.total
                )));
            }
            seen[frame] = true;
        }

        for (pid, frames) in &self.page_table {
            for &frame in frames {
                if frame >= self.total {
                    return Err(MemoryError::InvariantViolation(format!(
                        "frame {} of process {} out of range 0..{}",
                        frame, pid, self.total
                    )));
                }
                if seen[frame] {
                    return Err(MemoryError::InvariantViolation(format!(
                        "frame {} claimed twice (last by process {})",
                        frame, pid
                    )));
                }
                seen[frame] = true;
            }
        }

        match seen.iter().position(|&s| !s) {
            Some(frame) => Err(MemoryError::InvariantViolation(format!(
                "frame {} is neither free nor assigned",
                frame
            ))),
            None => Ok(()),
        }
    }
}
