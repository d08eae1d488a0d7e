/*!
 * Simulation Configuration
 *
 * Every tunable of a run in one serde-friendly struct. Values come from
 * the defaults in `core::limits`, optionally a JSON file named by
 * `SIM_CONFIG`, then `SIM_*` environment overrides.
 */

use crate::core::limits::*;
use crate::core::types::Priority;
use crate::scheduler::SchedulingPolicy;
use crate::simulation::AdmissionRetry;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to read configuration file: {0}")]
    Io(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Configuration for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SimulationConfig {
    /// Ready-queue selection policy
    pub policy: SchedulingPolicy,
    /// Round-robin slice in simulated seconds (ignored by FCFS/SJF)
    pub quantum: f64,
    /// Frames in the physical pool
    pub total_frames: usize,
    /// Pages requested by every process at admission
    pub pages_per_process: usize,
    /// Processes generated by `populate`
    pub process_count: usize,
    pub min_priority: Priority,
    pub max_priority: Priority,
    pub min_burst: f64,
    pub max_burst: f64,
    /// Simulated CPU time consumed per tick
    pub tick: f64,
    /// Wall-clock delay between ticks (ms)
    pub tick_interval_ms: u64,
    /// Wall-clock pause between dispatches (ms)
    pub scheduling_pause_ms: u64,
    pub io_service_min_ms: u64,
    pub io_service_max_ms: u64,
    /// Chance per tick that the running process issues an I/O request
    pub io_probability: f64,
    /// What happens to processes denied memory at admission
    pub admission_retry: AdmissionRetry,
    /// Seed for process generation and device service times
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            policy: SchedulingPolicy::Fcfs,
            quantum: DEFAULT_QUANTUM,
            total_frames: DEFAULT_TOTAL_FRAMES,
            pages_per_process: DEFAULT_PAGES_PER_PROCESS,
            process_count: DEFAULT_PROCESS_COUNT,
            min_priority: MIN_GENERATED_PRIORITY,
            max_priority: MAX_GENERATED_PRIORITY,
            min_burst: MIN_GENERATED_BURST,
            max_burst: MAX_GENERATED_BURST,
            tick: DEFAULT_TICK,
            tick_interval_ms: DEFAULT_TICK_INTERVAL.as_millis() as u64,
            scheduling_pause_ms: DEFAULT_SCHEDULING_PAUSE.as_millis() as u64,
            io_service_min_ms: IO_SERVICE_MIN.as_millis() as u64,
            io_service_max_ms: IO_SERVICE_MAX.as_millis() as u64,
            io_probability: 0.0,
            admission_retry: AdmissionRetry::Never,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Load configuration from `SIM_CONFIG` (if set) and `SIM_*` overrides
    pub fn load() -> ConfigResult<Self> {
        let base = match std::env::var("SIM_CONFIG") {
            Ok(path) if !path.is_empty() => Self::from_json_file(path)?,
            _ => Self::default(),
        };
        let config = base.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with `SIM_*` environment overrides applied
    pub fn from_env() -> ConfigResult<Self> {
        let config = Self::default().with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file; missing keys keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    fn with_env_overrides(mut self) -> ConfigResult<Self> {
        if let Some(policy) = env_value::<SchedulingPolicy>("SIM_POLICY")? {
            self.policy = policy;
        }
        if let Some(quantum) = env_value("SIM_QUANTUM")? {
            self.quantum = quantum;
        }
        if let Some(frames) = env_value("SIM_TOTAL_FRAMES")? {
            self.total_frames = frames;
        }
        if let Some(pages) = env_value("SIM_PAGES_PER_PROCESS")? {
            self.pages_per_process = pages;
        }
        if let Some(count) = env_value("SIM_PROCESS_COUNT")? {
            self.process_count = count;
        }
        if let Some(tick) = env_value("SIM_TICK")? {
            self.tick = tick;
        }
        if let Some(ms) = env_value("SIM_TICK_INTERVAL_MS")? {
            self.tick_interval_ms = ms;
        }
        if let Some(ms) = env_value("SIM_SCHEDULING_PAUSE_MS")? {
            self.scheduling_pause_ms = ms;
        }
        if let Some(p) = env_value("SIM_IO_PROBABILITY")? {
            self.io_probability = p;
        }
        if let Some(retry) = env_value::<AdmissionRetry>("SIM_ADMISSION_RETRY")? {
            self.admission_retry = retry;
        }
        if let Some(seed) = env_value("SIM_SEED")? {
            self.seed = Some(seed);
        }
        Ok(self)
    }

    /// Reject configurations the engine cannot run
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.tick.is_finite() && self.tick > 0.0) {
            return Err(invalid("tick", self.tick, "must be a positive number"));
        }
        if !(self.quantum.is_finite() && self.quantum > 0.0) {
            return Err(invalid("quantum", self.quantum, "must be a positive number"));
        }
        if self.min_priority > self.max_priority {
            return Err(invalid(
                "min_priority",
                self.min_priority,
                "must not exceed max_priority",
            ));
        }
        if !(self.min_burst.is_finite() && self.min_burst >= 0.0) {
            return Err(invalid("min_burst", self.min_burst, "must be non-negative"));
        }
        if !(self.max_burst.is_finite() && self.max_burst > self.min_burst) {
            return Err(invalid(
                "max_burst",
                self.max_burst,
                "must be greater than min_burst",
            ));
        }
        if self.io_service_min_ms > self.io_service_max_ms {
            return Err(invalid(
                "io_service_min_ms",
                self.io_service_min_ms,
                "must not exceed io_service_max_ms",
            ));
        }
        if !(0.0..=1.0).contains(&self.io_probability) {
            return Err(invalid(
                "io_probability",
                self.io_probability,
                "must be within [0, 1]",
            ));
        }
        Ok(())
    }

    pub fn with_policy(mut self, policy: SchedulingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_quantum(mut self, quantum: f64) -> Self {
        self.quantum = quantum;
        self
    }

    pub fn with_total_frames(mut self, total_frames: usize) -> Self {
        self.total_frames = total_frames;
        self
    }

    pub fn with_pages_per_process(mut self, pages: usize) -> Self {
        self.pages_per_process = pages;
        self
    }

    pub fn with_process_count(mut self, count: usize) -> Self {
        self.process_count = count;
        self
    }

    pub fn with_tick(mut self, tick: f64) -> Self {
        self.tick = tick;
        self
    }

    pub fn with_io_probability(mut self, probability: f64) -> Self {
        self.io_probability = probability;
        self
    }

    pub fn with_admission_retry(mut self, retry: AdmissionRetry) -> Self {
        self.admission_retry = retry;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run ticks and pauses back to back (tests, batch runs)
    pub fn without_delays(mut self) -> Self {
        self.tick_interval_ms = 0;
        self.scheduling_pause_ms = 0;
        self
    }

    #[inline]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    #[inline]
    pub fn scheduling_pause(&self) -> Duration {
        Duration::from_millis(self.scheduling_pause_ms)
    }

    #[inline]
    pub fn io_service_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.io_service_min_ms),
            Duration::from_millis(self.io_service_max_ms),
        )
    }
}

fn invalid(key: &str, value: impl ToString, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse an environment variable if present
fn env_value<T>(key: &str) -> ConfigResult<Option<T>>
where
    T: FromStr,
    T::Err: ToString,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| invalid(key, raw.trim(), &e.to_string())),
        _ => Ok(None),
    }
}
