/*!
 * Admission Retry Tests
 * Memory-blocked processes under the two retry policies
 */

use os_simulator::process::ProcessState;
use os_simulator::simulation::{AdmissionRetry, SimulationBuilder};
use os_simulator::SimulationConfig;
use pretty_assertions::assert_eq;

fn tight_memory(retry: AdmissionRetry) -> SimulationConfig {
    SimulationConfig::default()
        .with_total_frames(4)
        .with_pages_per_process(2)
        .with_admission_retry(retry)
        .without_delays()
}

#[tokio::test(start_paused = true)]
async fn test_never_retry_leaves_process_starved() {
    let mut driver = SimulationBuilder::new()
        .with_config(tight_memory(AdmissionRetry::Never))
        .build()
        .unwrap();
    for _ in 0..3 {
        driver.spawn_process(1, 0.2);
    }
    driver.admit_all().unwrap();

    let report = driver.run().await.unwrap();
    assert_eq!(report.terminated, vec![1, 2]);
    assert_eq!(report.starved, vec![3]);
    assert!(!report.all_terminated());
}

#[tokio::test(start_paused = true)]
async fn test_periodic_retry_admits_once_memory_frees() {
    let mut driver = SimulationBuilder::new()
        .with_config(tight_memory(AdmissionRetry::Periodic))
        .build()
        .unwrap();
    for _ in 0..4 {
        driver.spawn_process(1, 0.2);
    }
    driver.admit_all().unwrap();
    assert_eq!(driver.context().scheduler().len(), 2);

    let ctx = driver.context().clone();
    let report = driver.run().await.unwrap();

    assert_eq!(report.terminated, vec![1, 2, 3, 4]);
    assert!(report.starved.is_empty());
    assert!(ctx
        .processes()
        .snapshot()
        .iter()
        .all(|p| p.state == ProcessState::Terminated));
}

#[tokio::test(start_paused = true)]
async fn test_periodic_retry_cannot_fit_oversized_request() {
    let config = tight_memory(AdmissionRetry::Periodic).with_pages_per_process(5);
    let mut driver = SimulationBuilder::new().with_config(config).build().unwrap();
    driver.spawn_process(1, 0.2);
    driver.admit_all().unwrap();

    let report = driver.run().await.unwrap();
    assert!(report.terminated.is_empty());
    assert_eq!(report.starved, vec![1]);
}
