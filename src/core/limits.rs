/*!
 * Simulation Limits and Defaults
 *
 * Centralized location for the defaults a simulation run starts from.
 * Organized by subsystem so the configuration layer has one place to look.
 */

use std::time::Duration;

// =============================================================================
// MEMORY
// =============================================================================

/// Frames in the physical pool when nothing else is configured
pub const DEFAULT_TOTAL_FRAMES: usize = 20;

/// Pages requested by every generated process
pub const DEFAULT_PAGES_PER_PROCESS: usize = 2;

/// Usage ratio at which allocations start logging pressure
pub const MEMORY_MEDIUM_THRESHOLD: f64 = 0.60;

/// Warning threshold (80%)
pub const MEMORY_WARNING_THRESHOLD: f64 = 0.80;

/// Critical threshold (95%)
pub const MEMORY_CRITICAL_THRESHOLD: f64 = 0.95;

/// Cells per row when rendering the frame grid
pub const FRAME_GRID_COLUMNS: usize = 10;

// =============================================================================
// PROCESSES
// =============================================================================

/// Processes generated by `SimulationDriver::populate`
pub const DEFAULT_PROCESS_COUNT: usize = 10;

/// Lowest generated priority (inclusive)
pub const MIN_GENERATED_PRIORITY: u8 = 1;

/// Highest generated priority (inclusive)
pub const MAX_GENERATED_PRIORITY: u8 = 5;

/// Shortest generated burst in simulated seconds (inclusive)
pub const MIN_GENERATED_BURST: f64 = 1.0;

/// Longest generated burst in simulated seconds (exclusive)
pub const MAX_GENERATED_BURST: f64 = 3.0;

// =============================================================================
// SCHEDULING
// =============================================================================

/// Simulated CPU time consumed by one tick
pub const DEFAULT_TICK: f64 = 0.1;

/// Remaining time at or below this counts as finished (absorbs tick rounding)
pub const REMAINING_EPSILON: f64 = 1e-9;

/// Wall-clock delay between ticks of the running process
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Pause between two dispatches of the driver loop
pub const DEFAULT_SCHEDULING_PAUSE: Duration = Duration::from_millis(100);

/// Round-robin time slice in simulated seconds
pub const DEFAULT_QUANTUM: f64 = 0.5;

// =============================================================================
// I/O
// =============================================================================

/// Shortest simulated device service time
pub const IO_SERVICE_MIN: Duration = Duration::from_millis(500);

/// Longest simulated device service time
pub const IO_SERVICE_MAX: Duration = Duration::from_millis(2000);

// =============================================================================
// MONITORING
// =============================================================================

/// Capacity of the observer event ring (power of 2)
/// Producers never block; overflow is counted as dropped
pub const EVENT_RING_SIZE: usize = 4096;
