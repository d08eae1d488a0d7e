/*!
 * OS Resource Simulator - Main Entry Point
 *
 * Headless "start" command:
 * - Loads configuration from SIM_* variables (or SIM_CONFIG)
 * - Generates and admits processes
 * - Runs the simulation to completion
 * - Logs the process table, execution chart, and frame grid
 */

use os_simulator::simulation::view::{render_execution_chart, render_process_table, FrameGrid};
use os_simulator::{init_tracing, SimError, SimulationConfig, SimulationDriver};
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize structured tracing
    init_tracing();

    info!("OS simulator starting...");
    let config = SimulationConfig::load().map_err(SimError::from)?;
    info!(
        policy = config.policy.as_str(),
        total_frames = config.total_frames,
        processes = config.process_count,
        pages_per_process = config.pages_per_process,
        "Configuration loaded"
    );

    let mut driver = SimulationDriver::new(config)?;
    driver.populate();
    let admitted = driver.admit_all()?;
    info!(admitted, "Initial admission complete");

    let ctx = driver.context().clone();
    info!("\n{}", render_process_table(&ctx.processes().snapshot()));

    let handle = driver.start();
    let report = handle.wait().await?;

    let snapshot = ctx.snapshot();
    info!("\n{}", render_process_table(&snapshot.processes));
    info!("\n{}", render_execution_chart(&snapshot.processes));
    info!("\n{}", FrameGrid::from_snapshot(&snapshot.memory).render());
    info!(
        run_id = %report.run_id,
        terminated = ?report.terminated,
        starved = ?report.starved,
        dispatches = report.dispatches,
        ticks = report.ticks,
        "Run summary"
    );

    Ok(())
}
