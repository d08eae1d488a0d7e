/*!
 * Simulation Module
 * Driver, shared context, stepping, and observer views
 */

mod builder;
mod context;
mod driver;
mod stepping;
pub mod types;
pub mod view;

pub use builder::SimulationBuilder;
pub use context::SimulationContext;
pub use driver::{SimulationDriver, SimulationHandle};
pub use types::{AdmissionRetry, SimulationReport, SimulationSnapshot, StepOutcome};
pub use view::{ChartBar, FrameCell, FrameGrid, ProcessRow};
