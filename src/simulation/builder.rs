/*!
 * Simulation Builder
 * Builder pattern for SimulationDriver construction
 */

use super::driver::SimulationDriver;
use super::types::AdmissionRetry;
use crate::core::config::SimulationConfig;
use crate::core::types::SimResult;
use crate::monitoring::Collector;
use crate::scheduler::SchedulingPolicy;
use std::sync::Arc;

/// Builder for SimulationDriver
pub struct SimulationBuilder {
    config: SimulationConfig,
    collector: Option<Arc<Collector>>,
    populate: bool,
}

impl SimulationBuilder {
    pub fn new() -> Self {
        Self {
            config: SimulationConfig::default(),
            collector: None,
            populate: false,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_policy(mut self, policy: SchedulingPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    pub fn with_admission_retry(mut self, retry: AdmissionRetry) -> Self {
        self.config.admission_retry = retry;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Publish on a collector the caller already subscribed to
    pub fn with_collector(mut self, collector: Arc<Collector>) -> Self {
        self.collector = Some(collector);
        self
    }

    /// Generate and admit `process_count` random processes on build
    pub fn populated(mut self) -> Self {
        self.populate = true;
        self
    }

    pub fn build(self) -> SimResult<SimulationDriver> {
        let collector = self.collector.unwrap_or_else(|| Arc::new(Collector::new()));
        let mut driver = SimulationDriver::with_collector(self.config, collector)?;
        if self.populate {
            driver.populate();
            driver.admit_all()?;
        }
        Ok(driver)
    }
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
