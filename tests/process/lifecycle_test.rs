/*!
 * Process Lifecycle Tests
 * State transitions and tick accounting through the process table
 */

use os_simulator::process::{
    BlockReason, ProcessError, ProcessState, ProcessTable, TickOutcome,
};
use pretty_assertions::assert_eq;

fn running(table: &ProcessTable, burst: f64) -> u32 {
    let pid = table.spawn(2, burst);
    table.transition(pid, ProcessState::Ready).unwrap();
    table.transition(pid, ProcessState::Running).unwrap();
    pid
}

#[test]
fn test_quarter_second_burst_takes_three_ticks() {
    let table = ProcessTable::new();
    let pid = running(&table, 0.25);

    let mut observed = Vec::new();
    loop {
        match table.tick(pid, 0.1).unwrap() {
            TickOutcome::Continue(remaining) => {
                assert!(remaining >= 0.0);
                observed.push(remaining);
            }
            TickOutcome::Finished => break,
        }
    }

    assert_eq!(observed.len(), 2);
    let info = table.get(pid).unwrap();
    assert_eq!(info.remaining, 0.0);
    assert_eq!(info.state, ProcessState::Terminated);
    assert_eq!(table.total_ticks(), 3);
}

#[test]
fn test_terminated_rejects_all_transitions() {
    let table = ProcessTable::new();
    let pid = running(&table, 0.1);
    table.tick(pid, 0.1).unwrap();

    for to in [
        ProcessState::New,
        ProcessState::Ready,
        ProcessState::Running,
        ProcessState::Blocked(BlockReason::Io),
    ] {
        assert_eq!(
            table.transition(pid, to),
            Err(ProcessError::InvalidStateTransition {
                pid,
                from: ProcessState::Terminated,
                to
            })
        );
    }
}

#[test]
fn test_io_round_trip_states() {
    let table = ProcessTable::new();
    let pid = running(&table, 1.0);

    table
        .transition(pid, ProcessState::Blocked(BlockReason::Io))
        .unwrap();
    assert!(table.tick(pid, 0.1).is_err());
    table.transition(pid, ProcessState::Ready).unwrap();
    assert_eq!(table.state(pid), Some(ProcessState::Ready));
}

#[test]
fn test_snapshot_sorted_by_pid() {
    let table = ProcessTable::new();
    for burst in [1.0, 2.0, 3.0] {
        table.spawn(1, burst);
    }
    let pids: Vec<u32> = table.snapshot().iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![1, 2, 3]);
    assert_eq!(
        table.describe(2).as_deref(),
        Some("Process(ID=2, Priority=1, Time=2.00, State=New)")
    );
}
