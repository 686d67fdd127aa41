//! # Event bus.
//!
//! Every stage of the scheduler reports what it did by publishing an [`Event`]
//! here. The scheduler keeps one receiver of its own (the listener that feeds
//! the [`SubscriberSet`](crate::SubscriberSet)); callers may attach more through
//! [`Scheduler::subscribe`](crate::Scheduler::subscribe).
//!
//! ```text
//!   drainer ───┐
//!   selector ──┤                      ┌──► scheduler listener ──► SubscriberSet
//!   discovery ─┼──► Bus (ring of N) ──┤
//!   control ───┘                      └──► Scheduler::subscribe() receivers
//! ```
//!
//! Publishing never waits. A receiver that falls more than `N` events behind
//! gets `RecvError::Lagged` and resumes at the oldest retained event; events
//! published while nobody listens are gone.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast ring of runtime events; clones share one channel.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus retaining up to `capacity` events (at least one).
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes one event; dropped silently when nobody listens.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Publishes a run of events in order.
    pub fn publish_all(&self, events: impl IntoIterator<Item = Event>) {
        for ev in events {
            self.publish(ev);
        }
    }

    /// Attaches a receiver that sees events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
