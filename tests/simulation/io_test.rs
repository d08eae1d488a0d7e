/*!
 * I/O Concurrency Tests
 * A blocked process suspends only its own task
 */

use os_simulator::io::IoManager;
use os_simulator::monitoring::{Category, EventFilter, Payload};
use os_simulator::process::{BlockReason, ProcessState, ProcessTable};
use os_simulator::{SimulationConfig, SimulationDriver};
use pretty_assertions::assert_eq;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_other_process_completes_during_io_wait() {
    let table = ProcessTable::new();
    let io = IoManager::new()
        .with_service_range(Duration::from_millis(1500), Duration::from_millis(1500))
        .unwrap();

    let waiting = table.spawn(1, 1.0);
    let worker = table.spawn(1, 0.3);
    for pid in [waiting, worker] {
        table.transition(pid, ProcessState::Ready).unwrap();
    }
    table.transition(waiting, ProcessState::Running).unwrap();

    let ticket = io.begin(&table, waiting).unwrap();
    let io_task = {
        let io = io.clone();
        let table = table.clone();
        tokio::spawn(async move { io.complete(&table, ticket).await })
    };
    assert_eq!(
        table.state(waiting),
        Some(ProcessState::Blocked(BlockReason::Io))
    );

    table.transition(worker, ProcessState::Running).unwrap();
    let mut ticks = 0;
    while !table.state(worker).unwrap().is_terminated() {
        table.tick(worker, 0.1).unwrap();
        ticks += 1;
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    assert_eq!(ticks, 3);
    assert_eq!(
        table.state(waiting),
        Some(ProcessState::Blocked(BlockReason::Io))
    );

    let waited = io_task.await.unwrap().unwrap();
    assert_eq!(waited, Duration::from_millis(1500));
    assert_eq!(table.state(waiting), Some(ProcessState::Ready));
}

#[tokio::test(start_paused = true)]
async fn test_driver_finishes_everything_with_constant_io() {
    let config = SimulationConfig::default()
        .with_io_probability(1.0)
        .with_process_count(3)
        .with_seed(5);
    let mut driver = SimulationDriver::new(config).unwrap();
    driver.spawn_process(1, 0.3);
    driver.spawn_process(1, 0.3);
    driver.spawn_process(1, 0.3);
    driver.admit_all().unwrap();

    let mut events = driver.context().collector().subscribe();
    let report = driver.run().await.unwrap();

    assert_eq!(report.terminated.len(), 3);
    // Each process blocks after every tick except its last
    assert_eq!(report.io_requests, 6);
    assert_eq!(report.ticks, 9);
    assert!(driver.context().io().in_service().is_empty());

    let io_events = events.filter(&EventFilter::new().category(Category::Io));
    let started = io_events
        .iter()
        .filter(|e| matches!(e.payload, Payload::IoStarted { .. }))
        .count();
    let completed = io_events
        .iter()
        .filter(|e| matches!(e.payload, Payload::IoCompleted { .. }))
        .count();
    assert_eq!((started, completed), (6, 6));
}
