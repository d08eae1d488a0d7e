/*!
 * Monitoring
 * Structured tracing plus the event stream observers read engine changes from
 */

pub mod collection;
pub mod events;
pub mod streaming;
mod tracer;

pub use collection::Collector;
pub use events::{Category, Event, EventFilter, Payload, Severity};
pub use streaming::{EventStream, StreamStats, Subscriber};
pub use tracer::{generate_run_id, init_tracing, span_dispatch, span_simulation};
