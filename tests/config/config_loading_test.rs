/*!
 * Configuration Loading Tests
 * Environment overrides and JSON files
 */

use os_simulator::scheduler::SchedulingPolicy;
use os_simulator::simulation::AdmissionRetry;
use os_simulator::{ConfigError, SimulationConfig};
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

const VARS: &[&str] = &[
    "SIM_CONFIG",
    "SIM_POLICY",
    "SIM_QUANTUM",
    "SIM_TOTAL_FRAMES",
    "SIM_PAGES_PER_PROCESS",
    "SIM_PROCESS_COUNT",
    "SIM_TICK",
    "SIM_TICK_INTERVAL_MS",
    "SIM_SCHEDULING_PAUSE_MS",
    "SIM_IO_PROBABILITY",
    "SIM_ADMISSION_RETRY",
    "SIM_SEED",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_env_overrides_defaults() {
    clear_env();
    std::env::set_var("SIM_POLICY", "rr");
    std::env::set_var("SIM_QUANTUM", "0.3");
    std::env::set_var("SIM_TOTAL_FRAMES", "8");
    std::env::set_var("SIM_ADMISSION_RETRY", "periodic");
    std::env::set_var("SIM_SEED", "123");

    let config = SimulationConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.policy, SchedulingPolicy::RoundRobin);
    assert_eq!(config.quantum, 0.3);
    assert_eq!(config.total_frames, 8);
    assert_eq!(config.admission_retry, AdmissionRetry::Periodic);
    assert_eq!(config.seed, Some(123));
    assert_eq!(config.pages_per_process, 2);
}

#[test]
#[serial]
fn test_bad_env_value_names_the_variable() {
    clear_env();
    std::env::set_var("SIM_TOTAL_FRAMES", "lots");

    let err = SimulationConfig::from_env().unwrap_err();
    clear_env();

    match err {
        ConfigError::InvalidValue { key, value, .. } => {
            assert_eq!(key, "SIM_TOTAL_FRAMES");
            assert_eq!(value, "lots");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
#[serial]
fn test_load_reads_file_then_env() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{"policy": "sjf", "total_frames": 6, "process_count": 3}}"#
    )
    .unwrap();

    std::env::set_var("SIM_CONFIG", file.path());
    std::env::set_var("SIM_PROCESS_COUNT", "5");
    let config = SimulationConfig::load().unwrap();
    clear_env();

    assert_eq!(config.policy, SchedulingPolicy::Sjf);
    assert_eq!(config.total_frames, 6);
    assert_eq!(config.process_count, 5);
}

#[test]
#[serial]
fn test_invalid_file_is_parse_error() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "not json").unwrap();

    let err = SimulationConfig::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_round_trip_through_json() {
    let config = SimulationConfig::default()
        .with_policy(SchedulingPolicy::RoundRobin)
        .with_seed(7);
    let json = serde_json::to_string(&config).unwrap();
    let back: SimulationConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
