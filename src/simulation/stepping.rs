/*!
 * Execution Stepping
 * Cooperative tick loop for the process holding the CPU
 */

use super::context::SimulationContext;
use super::types::StepOutcome;
use crate::core::types::SimResult;
use crate::process::TickOutcome;
use crate::scheduler::Dispatch;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

/// Run one dispatch until the process terminates, blocks, or its slice ends
///
/// Each tick reduces remaining time by the configured increment and is
/// followed by a sleep of one tick interval, so other tasks (I/O waits,
/// observers) make progress while a process runs. `seed` drives the I/O
/// draw so seeded runs replay the same way.
pub(super) async fn advance(
    ctx: SimulationContext,
    dispatch: Dispatch,
    seed: u64,
) -> SimResult<StepOutcome> {
    let pid = dispatch.pid;
    let tick = ctx.config().tick;
    let interval = ctx.config().tick_interval();
    let io_probability = ctx.config().io_probability;
    let budget = dispatch.tick_budget(tick);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut used: u64 = 0;

    loop {
        let remaining = match ctx.processes().tick(pid, tick)? {
            TickOutcome::Finished => return Ok(StepOutcome::Terminated),
            TickOutcome::Continue(remaining) => remaining,
        };
        used += 1;
        trace!(pid, remaining, used, "tick");

        if io_probability > 0.0 && rng.gen_bool(io_probability) {
            return Ok(StepOutcome::BlockedOnIo);
        }
        if budget.is_some_and(|limit| used >= limit) {
            return Ok(StepOutcome::QuantumExpired { remaining });
        }

        if interval.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(interval).await;
        }
    }
}
