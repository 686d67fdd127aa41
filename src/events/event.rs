//! # Runtime events emitted by the scheduler.
//!
//! The [`EventKind`] enum classifies events across four categories:
//! - **Lifecycle events**: scheduler start and stop
//! - **Item events**: queueing, strategy choice, completion, failure
//! - **Controller events**: drainer activations and retuning
//! - **Discovery events**: scope failures and observer health
//!
//! The [`Event`] struct carries the metadata relevant to its kind
//! (item id, strategy, reason, controller figures).
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use drainvisor::{Event, EventKind, ItemId, Strategy};
//!
//! let ev = Event::new(EventKind::ItemFailed)
//!     .with_item(ItemId(7))
//!     .with_strategy(Strategy::Incremental)
//!     .with_reason("set_position failed: detached");
//!
//! assert_eq!(ev.kind, EventKind::ItemFailed);
//! assert_eq!(ev.item, Some(ItemId(7)));
//! assert_eq!(ev.reason.as_deref(), Some("set_position failed: detached"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::core::Strategy;
use crate::host::ItemId;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `origin`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `origin`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Lifecycle events ===
    /// Scheduler started: observer installed, periodic tasks spawned.
    SchedulerStarted,

    /// `stop()` was called; pending work cleared.
    ///
    /// Sets:
    /// - `taken`: number of pending items dropped
    StopRequested,

    // === Item events ===
    /// Item accepted into the pending queue.
    ///
    /// Sets:
    /// - `item`: item id
    ItemQueued,

    /// Item left the queue and its strategy was chosen.
    ///
    /// Sets:
    /// - `item`: item id
    /// - `strategy`: chosen strategy
    ItemStarting,

    /// Instant strategy failed; the item falls back to incremental.
    ///
    /// Sets:
    /// - `item`: item id
    /// - `reason`: failure message
    InstantFailed,

    /// Best-effort mute or pause before incremental stepping was refused;
    /// stepping goes on regardless.
    ///
    /// Sets:
    /// - `item`: item id
    /// - `reason`: failure message
    PrepareFailed,

    /// Item reached its terminal state and is marked done.
    ///
    /// Sets:
    /// - `item`: item id
    /// - `strategy`: strategy that finished it
    ItemDone,

    /// Item processing failed; the item is still marked done.
    ///
    /// Sets:
    /// - `item`: item id
    /// - `strategy`: strategy that failed
    /// - `reason`: failure message
    ItemFailed,

    /// Item left mid-flight because the scheduler stopped; not marked done.
    ///
    /// Sets:
    /// - `item`: item id
    /// - `strategy`: strategy that was running
    ItemAbandoned,

    /// Resource release for a finished item failed.
    ///
    /// Sets:
    /// - `item`: item id
    /// - `reason`: failure message
    ReleaseFailed,

    // === Controller events ===
    /// One drainer activation ran.
    ///
    /// Sets:
    /// - `taken`: items launched
    /// - `capacity`: free in-flight slots at activation start
    ActivationRan,

    /// Controller changed the concurrency limit.
    ///
    /// Sets:
    /// - `concurrency`: new limit
    /// - `avg_ms`: windowed average activation latency
    /// - `delay_ms`: new batch delay
    Retuned,

    // === Discovery events ===
    /// One scope could not be enumerated; siblings unaffected.
    ///
    /// Sets:
    /// - `origin`: scope label
    /// - `reason`: failure message
    DiscoveryFailed,

    /// Mutation observer found missing and could not be reinstalled.
    ///
    /// Sets:
    /// - `reason`: failure message
    ObserverLost,

    /// Mutation observer found missing and reinstalled.
    ObserverHealed,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Item the event is about.
    pub item: Option<ItemId>,
    /// Strategy involved.
    pub strategy: Option<Strategy>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Scope label or subscriber name.
    pub origin: Option<Arc<str>>,
    /// Concurrency limit (compact).
    pub concurrency: Option<u32>,
    /// Free in-flight slots (compact).
    pub capacity: Option<u32>,
    /// Number of items taken/dropped (compact).
    pub taken: Option<u32>,
    /// Windowed average latency in milliseconds.
    pub avg_ms: Option<f64>,
    /// Batch delay in milliseconds (compact).
    pub delay_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            item: None,
            strategy: None,
            reason: None,
            origin: None,
            concurrency: None,
            capacity: None,
            taken: None,
            avg_ms: None,
            delay_ms: None,
        }
    }

    /// Attaches an item id.
    #[inline]
    pub fn with_item(mut self, id: ItemId) -> Self {
        self.item = Some(id);
        self
    }

    /// Attaches a strategy.
    #[inline]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a scope label or subscriber name.
    #[inline]
    pub fn with_origin(mut self, origin: impl Into<Arc<str>>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Attaches a concurrency figure (saturated to `u32`).
    #[inline]
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = Some(n.min(u32::MAX as usize) as u32);
        self
    }

    /// Attaches a free-slot count (saturated to `u32`).
    #[inline]
    pub fn with_capacity(mut self, n: usize) -> Self {
        self.capacity = Some(n.min(u32::MAX as usize) as u32);
        self
    }

    /// Attaches an item count (saturated to `u32`).
    #[inline]
    pub fn with_taken(mut self, n: usize) -> Self {
        self.taken = Some(n.min(u32::MAX as usize) as u32);
        self
    }

    /// Attaches an average latency.
    #[inline]
    pub fn with_avg_ms(mut self, avg: f64) -> Self {
        self.avg_ms = Some(avg);
        self
    }

    /// Attaches a batch delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_origin(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_origin(subscriber)
            .with_reason(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_monotonic() {
        let a = Event::new(EventKind::ItemQueued);
        let b = Event::new(EventKind::ItemQueued);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn compact_fields_saturate() {
        let ev = Event::new(EventKind::Retuned)
            .with_delay(Duration::from_secs(u64::MAX / 2))
            .with_concurrency(usize::MAX);
        assert_eq!(ev.delay_ms, Some(u32::MAX));
        assert_eq!(ev.concurrency, Some(u32::MAX));
    }

    #[test]
    fn capacity_is_separate_from_concurrency() {
        let ev = Event::new(EventKind::ActivationRan)
            .with_taken(3)
            .with_capacity(usize::MAX);
        assert_eq!(ev.capacity, Some(u32::MAX));
        assert_eq!(ev.concurrency, None);
    }
}
