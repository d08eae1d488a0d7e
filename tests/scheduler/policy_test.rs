/*!
 * Scheduling Policy Tests
 * Selection order, admission rules, and the single-CPU guarantee
 */

use os_simulator::process::{BlockReason, Process, ProcessState};
use os_simulator::scheduler::{
    Admission, Scheduler, SchedulerError, SchedulingPolicy, TimeQuantum, TimeSlice,
};
use pretty_assertions::assert_eq;

fn admit_all(scheduler: &Scheduler, bursts: &[(u32, f64)]) {
    for &(pid, burst) in bursts {
        let mut process = Process::new(pid, 1, burst);
        assert_eq!(scheduler.admit(&mut process), Admission::Admitted);
    }
}

fn run_order(scheduler: &Scheduler) -> Vec<u32> {
    let mut order = Vec::new();
    while let Some(dispatch) = scheduler.select_next().unwrap() {
        order.push(dispatch.pid);
        assert!(scheduler.release(dispatch.pid));
    }
    order
}

#[test]
fn test_fcfs_order_equals_admission_order() {
    let scheduler = Scheduler::new(SchedulingPolicy::Fcfs);
    admit_all(&scheduler, &[(3, 2.0), (1, 0.5), (2, 9.0), (4, 1.0)]);
    assert_eq!(run_order(&scheduler), vec![3, 1, 2, 4]);
}

#[test]
fn test_sjf_selects_shortest_remaining() {
    let scheduler = Scheduler::new(SchedulingPolicy::Sjf);
    admit_all(&scheduler, &[(1, 3.0), (2, 1.0), (3, 2.0)]);

    let mut remaining = Vec::new();
    while let Some(dispatch) = scheduler.select_next().unwrap() {
        remaining.push(match dispatch.pid {
            1 => 3.0,
            2 => 1.0,
            _ => 2.0,
        });
        scheduler.release(dispatch.pid);
    }
    assert_eq!(remaining, vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_sjf_equal_times_keep_admission_order() {
    let scheduler = Scheduler::new(SchedulingPolicy::Sjf);
    admit_all(&scheduler, &[(5, 1.0), (3, 1.0), (8, 0.5), (1, 1.0)]);
    assert_eq!(run_order(&scheduler), vec![8, 5, 3, 1]);
}

#[test]
fn test_sjf_sees_requeued_remaining_time() {
    let scheduler = Scheduler::new(SchedulingPolicy::Sjf);
    admit_all(&scheduler, &[(1, 2.0), (2, 1.5)]);

    let first = scheduler.select_next().unwrap().unwrap();
    assert_eq!(first.pid, 2);
    assert!(scheduler.requeue(2, 0.2));
    assert_eq!(scheduler.select_next().unwrap().map(|d| d.pid), Some(2));
}

#[test]
fn test_round_robin_interleaves() {
    let quantum = TimeQuantum::new(0.2).unwrap();
    let scheduler = Scheduler::with_quantum(SchedulingPolicy::RoundRobin, quantum);
    admit_all(&scheduler, &[(1, 1.0), (2, 1.0), (3, 1.0)]);

    let mut order = Vec::new();
    for _ in 0..6 {
        let dispatch = scheduler.select_next().unwrap().unwrap();
        assert_eq!(dispatch.slice, TimeSlice::Quantum(0.2));
        order.push(dispatch.pid);
        assert!(scheduler.requeue(dispatch.pid, 0.5));
    }
    assert_eq!(order, vec![1, 2, 3, 1, 2, 3]);
}

#[test]
fn test_blocked_process_never_enters_queue() {
    let scheduler = Scheduler::default();
    let mut process = Process::new(1, 1, 1.0);
    process
        .transition(ProcessState::Blocked(BlockReason::Memory))
        .unwrap();

    assert_eq!(scheduler.admit(&mut process), Admission::RejectedBlocked);
    assert!(!scheduler.contains(1));
    assert_eq!(scheduler.select_next(), Ok(None));
}

#[test]
fn test_terminated_process_is_rejected() {
    let scheduler = Scheduler::default();
    let mut process = Process::new(1, 1, 0.1);
    process.transition(ProcessState::Ready).unwrap();
    process.transition(ProcessState::Running).unwrap();
    process.tick(0.1).unwrap();

    assert_eq!(scheduler.admit(&mut process), Admission::RejectedTerminated);
}

#[test]
fn test_at_most_one_running() {
    let scheduler = Scheduler::default();
    admit_all(&scheduler, &[(1, 1.0), (2, 1.0)]);

    let dispatch = scheduler.select_next().unwrap().unwrap();
    assert_eq!(
        scheduler.select_next(),
        Err(SchedulerError::CpuBusy(dispatch.pid))
    );
    assert!(!scheduler.queued().contains(&dispatch.pid));

    let mut running = Process::new(dispatch.pid, 1, 1.0);
    running.transition(ProcessState::Ready).unwrap();
    assert_eq!(scheduler.admit(&mut running), Admission::AlreadyQueued);
}

#[test]
fn test_concurrent_readers_during_selection() {
    let scheduler = Scheduler::new(SchedulingPolicy::Fcfs);
    admit_all(
        &scheduler,
        &(1..=100).map(|pid| (pid, 1.0)).collect::<Vec<_>>(),
    );

    let reader = {
        let scheduler = scheduler.clone();
        std::thread::spawn(move || {
            for _ in 0..1000 {
                let queued = scheduler.queued();
                let unique: std::collections::BTreeSet<_> = queued.iter().collect();
                assert_eq!(unique.len(), queued.len());
            }
        })
    };

    assert_eq!(run_order(&scheduler).len(), 100);
    reader.join().unwrap();
}
