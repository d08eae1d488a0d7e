/*!
 * Collection
 * Central orchestration for observer notifications
 */

mod collector;

pub use collector::Collector;
