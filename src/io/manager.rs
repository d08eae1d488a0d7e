/*!
 * I/O Manager
 * Blocking device access modelled as a random service delay
 *
 * A request is split in two so the caller can release the CPU before the
 * wait starts: `begin` blocks and queues the process synchronously,
 * `complete` suspends only the awaiting task and then readies the process.
 */

use super::types::{IoError, IoResult, IoStats, IoTicket};
use crate::core::limits::{IO_SERVICE_MAX, IO_SERVICE_MIN};
use crate::core::types::Pid;
use crate::monitoring::{Category, Collector, Payload, Severity};
use crate::process::{BlockReason, ProcessError, ProcessState, ProcessTable};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Simulated device
///
/// Several processes may be in service at once. Cloning shares the device.
pub struct IoManager {
    device_queue: Arc<Mutex<VecDeque<Pid>>>,
    service_min: Duration,
    service_max: Duration,
    rng: Arc<Mutex<StdRng>>,
    requests: Arc<AtomicU64>,
    completions: Arc<AtomicU64>,
    collector: Option<Arc<Collector>>,
}

impl IoManager {
    /// Device with the default 0.5s - 2.0s service range
    pub fn new() -> Self {
        Self {
            device_queue: Arc::new(Mutex::new(VecDeque::new())),
            service_min: IO_SERVICE_MIN,
            service_max: IO_SERVICE_MAX,
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
            requests: Arc::new(AtomicU64::new(0)),
            completions: Arc::new(AtomicU64::new(0)),
            collector: None,
        }
    }

    /// Set the service time range (inclusive)
    pub fn with_service_range(mut self, min: Duration, max: Duration) -> IoResult<Self> {
        if min > max {
            return Err(IoError::InvalidServiceRange { min, max });
        }
        self.service_min = min;
        self.service_max = max;
        Ok(self)
    }

    /// Make service times reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Arc::new(Mutex::new(StdRng::seed_from_u64(seed)));
        self
    }

    /// Add observability collector
    pub fn with_collector(mut self, collector: Arc<Collector>) -> Self {
        self.collector = Some(collector);
        self
    }

    /// Block a running process on the device
    ///
    /// Moves `pid` from Running to Blocked(Io) and queues it. Unknown or
    /// non-running processes are refused and the queue is left alone.
    pub fn begin(&self, processes: &ProcessTable, pid: Pid) -> IoResult<IoTicket> {
        match processes.state(pid) {
            None => return Err(ProcessError::NotFound(pid).into()),
            Some(ProcessState::Running) => {}
            Some(state) => return Err(ProcessError::NotRunning { pid, state }.into()),
        }

        processes.transition(pid, ProcessState::Blocked(BlockReason::Io))?;
        self.device_queue.lock().push_back(pid);
        self.requests.fetch_add(1, Ordering::Relaxed);

        let service = self.draw_service_time();
        let service_ms = service.as_millis() as u64;
        self.emit(pid, Payload::IoStarted { service_ms });
        info!(pid, service_ms, "I/O request started");

        Ok(IoTicket { pid, service })
    }

    /// Wait out the service time, then make the process Ready
    ///
    /// Suspends only the awaiting task.
    pub async fn complete(&self, processes: &ProcessTable, ticket: IoTicket) -> IoResult<Duration> {
        tokio::time::sleep(ticket.service).await;

        {
            let mut queue = self.device_queue.lock();
            if let Some(pos) = queue.iter().position(|&p| p == ticket.pid) {
                queue.remove(pos);
            }
        }
        processes.transition(ticket.pid, ProcessState::Ready)?;
        self.completions.fetch_add(1, Ordering::Relaxed);

        let service_ms = ticket.service.as_millis() as u64;
        self.emit(ticket.pid, Payload::IoCompleted { service_ms });
        info!(pid = ticket.pid, service_ms, "I/O request completed");

        Ok(ticket.service)
    }

    /// Block, wait, and ready a process in one call
    pub async fn request_io(&self, processes: &ProcessTable, pid: Pid) -> IoResult<Duration> {
        let ticket = self.begin(processes, pid)?;
        self.complete(processes, ticket).await
    }

    /// Processes currently in service, in request order
    pub fn in_service(&self) -> Vec<Pid> {
        self.device_queue.lock().iter().copied().collect()
    }

    pub fn stats(&self) -> IoStats {
        IoStats {
            requests: self.requests.load(Ordering::Relaxed),
            completions: self.completions.load(Ordering::Relaxed),
            in_service: self.device_queue.lock().len(),
        }
    }

    pub fn service_range(&self) -> (Duration, Duration) {
        (self.service_min, self.service_max)
    }

    fn draw_service_time(&self) -> Duration {
        if self.service_min == self.service_max {
            return self.service_min;
        }
        let millis = self.rng.lock().gen_range(
            self.service_min.as_millis() as u64..=self.service_max.as_millis() as u64,
        );
        debug!(millis, "Drew device service time");
        Duration::from_millis(millis)
    }

    fn emit(&self, pid: Pid, payload: Payload) {
        if let Some(ref collector) = self.collector {
            collector.emit_for(pid, Severity::Info, Category::Io, payload);
        }
    }
}

impl Clone for IoManager {
    fn clone(&self) -> Self {
        Self {
            device_queue: Arc::clone(&self.device_queue),
            service_min: self.service_min,
            service_max: self.service_max,
            rng: Arc::clone(&self.rng),
            requests: Arc::clone(&self.requests),
            completions: Arc::clone(&self.completions),
            collector: self.collector.as_ref().map(Arc::clone),
        }
    }
}

impl Default for IoManager {
    fn default() -> Self {
        Self::new()
    }
}
