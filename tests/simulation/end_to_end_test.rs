/*!
 * End-to-End Simulation Tests
 * Admission, scheduling, termination, and teardown in one run
 */

use os_simulator::monitoring::{Category, EventFilter, Payload};
use os_simulator::process::{BlockReason, ProcessState};
use os_simulator::scheduler::SchedulingPolicy;
use os_simulator::simulation::view::{execution_chart, FrameGrid};
use os_simulator::{SimulationConfig, SimulationDriver};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn three_processes_four_frames() -> SimulationConfig {
    SimulationConfig::default()
        .with_total_frames(4)
        .with_pages_per_process(2)
        .without_delays()
        .with_seed(42)
}

#[tokio::test(start_paused = true)]
async fn test_third_process_starves_and_memory_is_returned() {
    let mut driver = SimulationDriver::new(three_processes_four_frames()).unwrap();
    for burst in [0.3, 0.2, 0.1] {
        driver.spawn_process(1, burst);
    }

    assert_eq!(driver.admit_all().unwrap(), 2);
    let ctx = driver.context().clone();
    assert_eq!(ctx.memory().frames_of(1), Some(vec![0, 1]));
    assert_eq!(ctx.memory().frames_of(2), Some(vec![2, 3]));
    assert_eq!(
        ctx.processes().state(3),
        Some(ProcessState::Blocked(BlockReason::Memory))
    );

    let report = driver.run().await.unwrap();

    assert_eq!(report.terminated, vec![1, 2]);
    assert_eq!(report.starved, vec![3]);
    assert_eq!(report.dispatches, 2);
    assert_eq!(report.memory.free, (0..4).collect::<BTreeSet<usize>>());
    assert!(report.memory.page_table.is_empty());

    let p3 = ctx.processes().get(3).unwrap();
    assert_eq!(p3.remaining, 0.1);
    assert_eq!(p3.state, ProcessState::Blocked(BlockReason::Memory));
}

#[tokio::test(start_paused = true)]
async fn test_memory_freed_as_each_process_terminates() {
    let config = three_processes_four_frames();
    let mut driver = SimulationDriver::new(config).unwrap();
    driver.spawn_process(1, 0.1);
    driver.spawn_process(1, 0.1);
    driver.admit_all().unwrap();

    let ctx = driver.context().clone();
    let mut events = ctx.collector().subscribe();
    driver.run().await.unwrap();

    let freed: Vec<Vec<usize>> = events
        .filter(&EventFilter::new().category(Category::Memory))
        .into_iter()
        .filter_map(|e| match e.payload {
            Payload::MemoryFreed { frames } => Some(frames),
            _ => None,
        })
        .collect();
    assert_eq!(freed, vec![vec![0, 1], vec![2, 3]]);
}

#[tokio::test(start_paused = true)]
async fn test_sjf_run_completes_shortest_first() {
    let config = SimulationConfig::default()
        .with_policy(SchedulingPolicy::Sjf)
        .without_delays();
    let mut driver = SimulationDriver::new(config).unwrap();
    for burst in [0.3, 0.1, 0.2] {
        driver.spawn_process(1, burst);
    }
    driver.admit_all().unwrap();

    let report = driver.run().await.unwrap();
    assert_eq!(report.terminated, vec![2, 3, 1]);
}

#[tokio::test(start_paused = true)]
async fn test_round_robin_run_interleaves_processes() {
    let config = SimulationConfig::default()
        .with_policy(SchedulingPolicy::RoundRobin)
        .with_quantum(0.5)
        .with_tick(0.25)
        .without_delays();
    let mut driver = SimulationDriver::new(config).unwrap();
    driver.spawn_process(1, 1.5);
    driver.spawn_process(1, 0.25);
    driver.admit_all().unwrap();

    let report = driver.run().await.unwrap();
    assert_eq!(report.terminated, vec![2, 1]);
    // P1 slice, P2 finishes, P1 slice, P1 finishes
    assert_eq!(report.dispatches, 4);
    assert_eq!(report.ticks, 7);
    assert_eq!(driver.context().scheduler().stats().preemptions, 2);
}

#[tokio::test(start_paused = true)]
async fn test_start_handle_and_completion_signal() {
    let config = SimulationConfig::default()
        .with_process_count(4)
        .with_seed(9);
    let mut driver = SimulationDriver::new(config).unwrap();
    driver.populate();
    driver.admit_all().unwrap();

    let mut events = driver.context().collector().subscribe();
    let handle = driver.start();
    let ctx = handle.context().clone();
    let report = handle.wait().await.unwrap();

    assert_eq!(report.terminated.len(), 4);
    assert!(report.starved.is_empty());

    let snapshot = ctx.snapshot();
    assert!(snapshot
        .processes
        .iter()
        .all(|p| p.state == ProcessState::Terminated && p.remaining == 0.0));
    assert!(execution_chart(&snapshot.processes)
        .iter()
        .all(|bar| bar.length == 0.0 && !bar.running));
    assert!(FrameGrid::from_snapshot(&snapshot.memory)
        .rows
        .iter()
        .flatten()
        .all(|cell| *cell == os_simulator::simulation::FrameCell::Free));

    let complete = events
        .drain()
        .into_iter()
        .find(|e| e.category == Category::Simulation);
    assert_eq!(
        complete.map(|e| e.payload),
        Some(Payload::SimulationComplete {
            terminated: 4,
            starved: 0
        })
    );
}
