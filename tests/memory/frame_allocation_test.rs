/*!
 * Frame Allocation Tests
 * Boundary behaviour, round-trips, and the page-table uniqueness rule
 */

use os_simulator::memory::{FrameAllocator, MemoryError, MemoryInfo, MemoryManager, MemoryPressure};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

#[test]
fn test_full_pool_denies_and_stays_unchanged() {
    let manager = MemoryManager::new(4);
    manager.allocate(1, 4).unwrap();
    assert_eq!(manager.free_count(), 0);

    let before = manager.snapshot();
    let result = manager.allocate(2, 1);

    assert_eq!(
        result,
        Err(MemoryError::InsufficientFrames {
            requested: 1,
            available: 0,
            total: 4
        })
    );
    assert_eq!(manager.snapshot(), before);
    assert!(!manager.holds_memory(2));
}

#[test]
fn test_zero_page_request_on_full_pool() {
    let manager = MemoryManager::new(4);
    manager.allocate(1, 4).unwrap();

    assert_eq!(manager.allocate(2, 0).unwrap(), Vec::<usize>::new());
    assert_eq!(manager.free_count(), 0);
}

#[test]
fn test_allocate_then_deallocate_restores_free_set() {
    let manager = MemoryManager::new(8);
    manager.allocate(1, 2).unwrap();
    let before: BTreeSet<usize> = manager.snapshot().free;

    let frames = manager.allocate(2, 3).unwrap();
    assert_eq!(frames, vec![2, 3, 4]);
    assert_eq!(manager.deallocate(2), frames);

    assert_eq!(manager.snapshot().free, before);
    assert!(manager.check_invariants().is_ok());
}

#[test]
fn test_pid_appears_once_in_page_table() {
    let manager = MemoryManager::new(10);
    manager.allocate(5, 2).unwrap();

    assert_eq!(manager.allocate(5, 3), Err(MemoryError::AlreadyAllocated(5)));
    let snapshot = manager.snapshot();
    assert_eq!(snapshot.page_table.len(), 1);
    assert_eq!(snapshot.page_table[&5], vec![0, 1]);
}

#[test]
fn test_trait_objects_share_state() {
    let manager = MemoryManager::new(5);
    let allocator: &dyn FrameAllocator = &manager;
    let info: &dyn MemoryInfo = &manager;

    allocator.allocate(1, 4).unwrap();
    assert_eq!(info.frames_of(1), Some(vec![0, 1, 2, 3]));
    assert_eq!(info.stats().used_frames, 4);
    assert_eq!(info.pressure(), MemoryPressure::High);

    assert_eq!(allocator.deallocate(1).len(), 4);
    assert_eq!(info.pressure(), MemoryPressure::Low);
}

#[test]
fn test_clones_share_pool() {
    let manager = MemoryManager::new(4);
    let clone = manager.clone();
    clone.allocate(1, 3).unwrap();
    assert_eq!(manager.free_count(), 1);
}

#[test]
fn test_concurrent_allocations_never_overlap() {
    let manager = MemoryManager::new(64);
    let handles: Vec<_> = (1..=16u32)
        .map(|pid| {
            let manager = manager.clone();
            std::thread::spawn(move || manager.allocate(pid, 5).ok())
        })
        .collect();

    let granted: Vec<Vec<usize>> = handles
        .into_iter()
        .filter_map(|h| h.join().unwrap())
        .collect();

    // 64 frames fit twelve 5-frame requests
    assert_eq!(granted.len(), 12);
    let all: BTreeSet<usize> = granted.iter().flatten().copied().collect();
    assert_eq!(all.len(), 60);
    assert!(manager.check_invariants().is_ok());
}
