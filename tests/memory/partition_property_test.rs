/*!
 * Partition Property Tests
 * The free set and page table partition the pool after any operation sequence
 */

use os_simulator::memory::MemoryManager;
use proptest::prelude::*;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
enum Op {
    Allocate { pid: u32, count: usize },
    Deallocate { pid: u32 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u32..8, 0usize..6).prop_map(|(pid, count)| Op::Allocate { pid, count }),
        (1u32..8).prop_map(|pid| Op::Deallocate { pid }),
    ]
}

proptest! {
    #[test]
    fn free_set_and_page_table_partition_pool(
        total in 0usize..24,
        ops in prop::collection::vec(op(), 0..64),
    ) {
        let manager = MemoryManager::new(total);

        for op in ops {
            let before = manager.snapshot();
            match op {
                Op::Allocate { pid, count } => {
                    if manager.allocate(pid, count).is_err() {
                        prop_assert_eq!(manager.snapshot(), before);
                    }
                }
                Op::Deallocate { pid } => {
                    manager.deallocate(pid);
                }
            }

            let snapshot = manager.snapshot();
            let mut seen: BTreeSet<usize> = snapshot.free.clone();
            let mut assigned = 0;
            for frames in snapshot.page_table.values() {
                assigned += frames.len();
                seen.extend(frames.iter().copied());
            }
            prop_assert_eq!(snapshot.free.len() + assigned, total);
            prop_assert_eq!(seen, (0..total).collect::<BTreeSet<usize>>());
            prop_assert!(manager.check_invariants().is_ok());
        }
    }
}
