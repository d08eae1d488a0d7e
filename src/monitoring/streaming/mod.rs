/*!
 * Event Streaming
 * Bounded event ring between engine subsystems and observers
 *
 * Publishing never blocks the engine. When the ring is full the oldest
 * buffered event is evicted, so a late drain still ends with the newest
 * state changes and the run completion notice.
 */

use crate::core::limits::EVENT_RING_SIZE;
use crate::monitoring::events::{Event, EventFilter};
use crossbeam_queue::ArrayQueue;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Counters for the observer path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Events accepted into the ring
    pub published: u64,
    /// Events handed to a subscriber
    pub delivered: u64,
    /// Buffered events pushed out by newer ones
    pub evicted: u64,
    pub subscribers: usize,
}

struct Ring {
    events: ArrayQueue<Event>,
    published: AtomicU64,
    delivered: AtomicU64,
    evicted: AtomicU64,
    subscribers: AtomicUsize,
}

/// Shared handle to the event ring; clones see the same buffer
#[derive(Clone)]
pub struct EventStream {
    ring: Arc<Ring>,
}

impl EventStream {
    pub fn new() -> Self {
        Self::with_capacity(EVENT_RING_SIZE)
    }

    /// Stream holding at most `capacity` undelivered events
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ring: Arc::new(Ring {
                events: ArrayQueue::new(capacity.max(1)),
                published: AtomicU64::new(0),
                delivered: AtomicU64::new(0),
                evicted: AtomicU64::new(0),
                subscribers: AtomicUsize::new(0),
            }),
        }
    }

    /// Append an event, evicting the oldest one when full
    ///
    /// Returns false when an older event had to make room.
    #[inline]
    pub fn publish(&self, event: Event) -> bool {
        let displaced = self.ring.events.force_push(event);
        self.ring.published.fetch_add(1, Ordering::Relaxed);
        match displaced {
            Some(_) => {
                self.ring.evicted.fetch_add(1, Ordering::Relaxed);
                false
            }
            None => true,
        }
    }

    #[inline]
    fn take(&self) -> Option<Event> {
        let event = self.ring.events.pop()?;
        self.ring.delivered.fetch_add(1, Ordering::Relaxed);
        Some(event)
    }

    pub fn subscribe(&self) -> Subscriber {
        self.ring.subscribers.fetch_add(1, Ordering::Relaxed);
        Subscriber {
            stream: self.clone(),
            received: 0,
        }
    }

    pub fn stats(&self) -> StreamStats {
        StreamStats {
            published: self.ring.published.load(Ordering::Relaxed),
            delivered: self.ring.delivered.load(Ordering::Relaxed),
            evicted: self.ring.evicted.load(Ordering::Relaxed),
            subscribers: self.ring.subscribers.load(Ordering::Relaxed),
        }
    }
}

impl Default for EventStream {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer handle; events taken by one subscriber are gone for the rest
pub struct Subscriber {
    stream: EventStream,
    received: u64,
}

impl Subscriber {
    #[inline]
    pub fn next(&mut self) -> Option<Event> {
        let event = self.stream.take()?;
        self.received += 1;
        Some(event)
    }

    /// Take everything currently buffered, oldest first
    pub fn drain(&mut self) -> Vec<Event> {
        std::iter::from_fn(|| self.next()).collect()
    }

    /// Drain, keeping only events that match `filter`
    pub fn filter(&mut self, filter: &EventFilter) -> Vec<Event> {
        let mut events = self.drain();
        events.retain(|event| event.matches(filter));
        events
    }

    /// Events this handle has received
    #[inline]
    pub fn received(&self) -> u64 {
        self.received
    }
}

impl Drop for Subscriber {
    fn drop(&mut self) {
        self.stream.ring.subscribers.fetch_sub(1, Ordering::Relaxed);
    }
}
