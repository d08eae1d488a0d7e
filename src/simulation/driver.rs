/*!
 * Simulation Driver
 * Sequences admission, dispatch, stepping, I/O, and teardown
 */

use super::context::SimulationContext;
use super::stepping;
use super::types::{AdmissionRetry, SimulationReport, StepOutcome};
use crate::core::config::SimulationConfig;
use crate::core::types::{Pid, Priority, SimResult, SimTime};
use crate::io::IoResult;
use crate::memory::MemoryError;
use crate::monitoring::{
    generate_run_id, span_dispatch, span_simulation, Category, Collector, Event, Payload, Severity,
};
use crate::process::{BlockReason, ProcessState};
use crate::scheduler::Dispatch;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn, Instrument};

type IoCompletion = (Pid, IoResult<Duration>);

/// Orchestrates one simulation run
///
/// The driver is the only component that sequences the others. I/O waits
/// run in their own tasks and report back over a channel so the loop keeps
/// dispatching while a device request is in service.
pub struct SimulationDriver {
    ctx: SimulationContext,
    rng: StdRng,
    run_id: String,
    io_tx: mpsc::UnboundedSender<IoCompletion>,
    io_rx: mpsc::UnboundedReceiver<IoCompletion>,
    outstanding_io: usize,
    terminated: Vec<Pid>,
    dispatches: u64,
}

impl SimulationDriver {
    /// Build a driver and its subsystems from `config`
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        Self::with_collector(config, Arc::new(Collector::new()))
    }

    /// Build a driver that publishes on an existing collector
    pub fn with_collector(config: SimulationConfig, collector: Arc<Collector>) -> SimResult<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let ctx = SimulationContext::new(config, collector)?;
        let (io_tx, io_rx) = mpsc::unbounded_channel();

        Ok(Self {
            ctx,
            rng,
            run_id: generate_run_id(),
            io_tx,
            io_rx,
            outstanding_io: 0,
            terminated: Vec::new(),
            dispatches: 0,
        })
    }

    /// Builder with default configuration
    pub fn builder() -> super::SimulationBuilder {
        super::SimulationBuilder::new()
    }

    #[inline]
    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    #[inline]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Create a process in New with the next pid
    pub fn spawn_process(&self, priority: Priority, burst: SimTime) -> Pid {
        self.ctx.processes().spawn(priority, burst)
    }

    /// Create `process_count` processes with random priority and burst
    pub fn populate(&mut self) -> Vec<Pid> {
        let config = self.ctx.config();
        let (count, min_priority, max_priority) =
            (config.process_count, config.min_priority, config.max_priority);
        let (min_burst, max_burst) = (config.min_burst, config.max_burst);

        let pids: Vec<Pid> = (0..count)
            .map(|_| {
                let priority = self.rng.gen_range(min_priority..=max_priority);
                let burst = self.rng.gen_range(min_burst..max_burst);
                self.ctx.processes().spawn(priority, burst)
            })
            .collect();

        info!(count = pids.len(), "Processes created");
        pids
    }

    /// Try to admit every New process, in pid order
    ///
    /// Returns how many were admitted. Denied processes become
    /// Blocked(memory) and are excluded from scheduling.
    pub fn admit_all(&self) -> SimResult<usize> {
        let mut admitted = 0;
        for pid in self.ctx.processes().pids_in(ProcessState::New) {
            if self.try_admit(pid)? {
                admitted += 1;
            }
        }
        Ok(admitted)
    }

    /// Allocate frames for `pid` and hand it to the scheduler
    fn try_admit(&self, pid: Pid) -> SimResult<bool> {
        let pages = self.ctx.config().pages_per_process;
        let processes = self.ctx.processes();

        match self.ctx.memory().allocate(pid, pages) {
            Ok(frames) => {
                if processes.state(pid) == Some(ProcessState::Blocked(BlockReason::Memory)) {
                    processes.transition(pid, ProcessState::Ready)?;
                }
                let admission = processes.with_mut(pid, |p| self.ctx.scheduler().admit(p))?;
                if !admission.is_admitted() {
                    self.ctx.memory().deallocate(pid);
                    warn!(pid, ?admission, "Scheduler refused process, frames returned");
                    return Ok(false);
                }
                info!(pid, frames = ?frames, "Process admitted");
                Ok(true)
            }
            Err(MemoryError::InsufficientFrames { .. }) => {
                let blocked = ProcessState::Blocked(BlockReason::Memory);
                if processes.state(pid) == Some(blocked) {
                    debug!(pid, "Still not enough memory");
                } else {
                    processes.transition(pid, blocked)?;
                    warn!(pid, "Not enough memory for Process {}", pid);
                }
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Run the driver loop, then finalize
    pub async fn run(&mut self) -> SimResult<SimulationReport> {
        let span = span_simulation(&self.run_id, self.ctx.config().policy.as_str());
        async {
            self.run_loop().await?;
            self.finalize()
        }
        .instrument(span)
        .await
    }

    async fn run_loop(&mut self) -> SimResult<()> {
        let pause = self.ctx.config().scheduling_pause();
        let retry = self.ctx.config().admission_retry;
        info!(
            processes = self.ctx.processes().len(),
            ready = self.ctx.scheduler().len(),
            "Simulation started"
        );

        loop {
            if retry == AdmissionRetry::Periodic {
                self.retry_blocked()?;
            }
            while let Ok(done) = self.io_rx.try_recv() {
                self.on_io_complete(done)?;
            }

            match self.ctx.scheduler().select_next()? {
                Some(dispatch) => {
                    self.dispatch(dispatch).await?;
                    if !pause.is_zero() {
                        tokio::time::sleep(pause).await;
                    }
                }
                None if self.outstanding_io > 0 => {
                    if let Some(done) = self.io_rx.recv().await {
                        self.on_io_complete(done)?;
                    }
                }
                None => break,
            }
        }
        Ok(())
    }

    fn retry_blocked(&self) -> SimResult<()> {
        let blocked = ProcessState::Blocked(BlockReason::Memory);
        for pid in self.ctx.processes().pids_in(blocked) {
            if self.ctx.memory().free_count() < self.ctx.config().pages_per_process {
                break;
            }
            self.try_admit(pid)?;
        }
        Ok(())
    }

    async fn dispatch(&mut self, dispatch: Dispatch) -> SimResult<()> {
        let pid = dispatch.pid;
        let requeue = dispatch.requeue_if_unfinished();
        self.dispatches += 1;
        self.ctx.processes().transition(pid, ProcessState::Running)?;
        debug!(pid, slice = ?dispatch.slice, "Dispatching process");

        let seed: u64 = self.rng.gen();
        let step = stepping::advance(self.ctx.clone(), dispatch, seed).instrument(span_dispatch(pid));
        let outcome = tokio::spawn(step).await??;

        match outcome {
            StepOutcome::Terminated => {
                self.ctx.scheduler().release(pid);
                let frames = self.ctx.memory().deallocate(pid);
                self.terminated.push(pid);
                info!(pid, frames = ?frames, "Process terminated");
            }
            StepOutcome::QuantumExpired { remaining } if requeue => {
                self.ctx.processes().transition(pid, ProcessState::Ready)?;
                self.ctx.scheduler().requeue(pid, remaining);
            }
            StepOutcome::QuantumExpired { .. } => {
                return Err(format!("process {} ran out of a run-to-completion slice", pid).into());
            }
            StepOutcome::BlockedOnIo => {
                self.ctx.scheduler().release(pid);
                let ticket = self.ctx.io().begin(self.ctx.processes(), pid)?;
                self.outstanding_io += 1;

                let io = self.ctx.io().clone();
                let processes = self.ctx.processes().clone();
                let tx = self.io_tx.clone();
                tokio::spawn(async move {
                    let result = io.complete(&processes, ticket).await;
                    if tx.send((ticket.pid, result)).is_err() {
                        debug!(pid = ticket.pid, "Driver gone before I/O completed");
                    }
                });
            }
        }
        Ok(())
    }

    fn on_io_complete(&mut self, (pid, result): IoCompletion) -> SimResult<()> {
        self.outstanding_io = self.outstanding_io.saturating_sub(1);
        result?;
        let admission = self
            .ctx
            .processes()
            .with_mut(pid, |p| self.ctx.scheduler().admit(p))?;
        debug!(pid, ?admission, "Process back from I/O");
        Ok(())
    }

    /// Release outstanding memory and report the run
    ///
    /// Safe to call more than once.
    pub fn finalize(&self) -> SimResult<SimulationReport> {
        self.ctx.memory().deallocate_all();
        self.ctx.memory().check_invariants()?;

        let starved = self
            .ctx
            .processes()
            .pids_in(ProcessState::Blocked(BlockReason::Memory));

        self.ctx.collector().emit(Event::new(
            Severity::Info,
            Category::Simulation,
            Payload::SimulationComplete {
                terminated: self.terminated.len(),
                starved: starved.len(),
            },
        ));
        info!(
            terminated = self.terminated.len(),
            starved = starved.len(),
            dispatches = self.dispatches,
            "Simulation finished."
        );

        Ok(SimulationReport {
            run_id: self.run_id.clone(),
            policy: self.ctx.scheduler().policy(),
            terminated: self.terminated.clone(),
            starved,
            dispatches: self.dispatches,
            ticks: self.ctx.processes().total_ticks(),
            io_requests: self.ctx.io().stats().requests,
            memory: self.ctx.memory().snapshot(),
        })
    }

    /// Run on its own task; the handle exposes the context while it runs
    pub fn start(self) -> SimulationHandle {
        let ctx = self.ctx.clone();
        let mut driver = self;
        let task = tokio::spawn(async move { driver.run().await });
        SimulationHandle { ctx, task }
    }
}

/// Handle to a run started with `SimulationDriver::start`
pub struct SimulationHandle {
    ctx: SimulationContext,
    task: JoinHandle<SimResult<SimulationReport>>,
}

impl SimulationHandle {
    /// Shared engine state for observers
    #[inline]
    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the run to complete
    pub async fn wait(self) -> SimResult<SimulationReport> {
        self.task.await?
    }
}
