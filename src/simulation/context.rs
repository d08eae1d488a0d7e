/*!
 * Simulation Context
 * Shared handles to every engine subsystem
 */

use super::types::SimulationSnapshot;
use crate::core::config::SimulationConfig;
use crate::core::types::SimResult;
use crate::io::IoManager;
use crate::memory::MemoryManager;
use crate::monitoring::Collector;
use crate::process::ProcessTable;
use crate::scheduler::{Scheduler, TimeQuantum};
use std::sync::Arc;

/// Engine state for one run
///
/// Owned by the driver and cloned into tasks; clones share the same
/// subsystems. Subsystem methods are the only mutation path.
#[derive(Clone)]
pub struct SimulationContext {
    processes: ProcessTable,
    memory: MemoryManager,
    scheduler: Scheduler,
    io: IoManager,
    collector: Arc<Collector>,
    config: Arc<SimulationConfig>,
}

impl SimulationContext {
    /// Build every subsystem from a validated configuration
    pub fn new(config: SimulationConfig, collector: Arc<Collector>) -> SimResult<Self> {
        config.validate()?;

        let quantum = TimeQuantum::new(config.quantum)?;
        let (service_min, service_max) = config.io_service_range();

        let processes = ProcessTable::new().with_collector(Arc::clone(&collector));
        let memory = MemoryManager::new(config.total_frames).with_collector(Arc::clone(&collector));
        let scheduler =
            Scheduler::with_quantum(config.policy, quantum).with_collector(Arc::clone(&collector));
        let mut io = IoManager::new()
            .with_service_range(service_min, service_max)?
            .with_collector(Arc::clone(&collector));
        if let Some(seed) = config.seed {
            io = io.with_seed(seed.wrapping_add(1));
        }

        Ok(Self {
            processes,
            memory,
            scheduler,
            io,
            collector,
            config: Arc::new(config),
        })
    }

    #[inline]
    pub fn processes(&self) -> &ProcessTable {
        &self.processes
    }

    #[inline]
    pub fn memory(&self) -> &MemoryManager {
        &self.memory
    }

    #[inline]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    #[inline]
    pub fn io(&self) -> &IoManager {
        &self.io
    }

    #[inline]
    pub fn collector(&self) -> &Arc<Collector> {
        &self.collector
    }

    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Process table and frame pool as observers see them
    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            processes: self.processes.snapshot(),
            memory: self.memory.snapshot(),
        }
    }
}
