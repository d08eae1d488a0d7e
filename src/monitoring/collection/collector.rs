/*!
 * Unified Collector
 * Central entry point subsystems publish observable state changes through
 */

use crate::core::types::Pid;
use crate::monitoring::events::{Category, Event, Payload, Severity};
use crate::monitoring::streaming::{EventStream, StreamStats, Subscriber};

/// Observer-facing event collector
///
/// Engine subsystems hold an `Arc<Collector>` and emit after each mutation
/// completes; observers subscribe and then query snapshots.
pub struct Collector {
    stream: EventStream,
}

impl Collector {
    pub fn new() -> Self {
        Self {
            stream: EventStream::new(),
        }
    }

    /// Collector backed by a ring of the given size
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            stream: EventStream::with_capacity(capacity),
        }
    }

    /// Emit an event (primary API)
    #[inline]
    pub fn emit(&self, event: Event) {
        if !self.stream.publish(event) {
            tracing::trace!("event ring full, evicted oldest event");
        }
    }

    /// Emit a process-scoped event
    #[inline]
    pub fn emit_for(&self, pid: Pid, severity: Severity, category: Category, payload: Payload) {
        self.emit(Event::new(severity, category, payload).with_pid(pid));
    }

    pub fn subscribe(&self) -> Subscriber {
        self.stream.subscribe()
    }

    pub fn stream_stats(&self) -> StreamStats {
        self.stream.stats()
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}
