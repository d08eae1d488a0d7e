/*!
 * I/O Module
 * Simulated blocking device
 */

pub mod manager;
pub mod types;

pub use manager::IoManager;
pub use types::{IoError, IoResult, IoStats, IoTicket};
