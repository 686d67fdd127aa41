//! # Subscriber contract.
//!
//! A [`Subscribe`] implementation observes scheduler events: logging, metrics,
//! progress bars, test recorders. The [`SubscriberSet`](crate::SubscriberSet) gives
//! each subscriber its own bounded queue and worker task, so a slow subscriber
//! only ever delays itself.
//!
//! - [`Subscribe::wants`] filters events before they are queued; chatty kinds
//!   (`ItemQueued`, `ActivationRan`) can be skipped without costing queue space.
//! - When a queue is full the event is dropped for that subscriber and
//!   `SubscriberOverflow` is published.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicU64, Ordering};
//!
//! use async_trait::async_trait;
//! use drainvisor::{Event, EventKind, Subscribe};
//!
//! #[derive(Default)]
//! struct Finished(AtomicU64);
//!
//! #[async_trait]
//! impl Subscribe for Finished {
//!     async fn on_event(&self, _ev: &Event) {
//!         self.0.fetch_add(1, Ordering::Relaxed);
//!     }
//!
//!     fn wants(&self, kind: EventKind) -> bool {
//!         matches!(kind, EventKind::ItemDone | EventKind::ItemFailed)
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "finished"
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};

/// Event observer driven by a dedicated worker.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event. Panics are caught and reported as `SubscriberPanicked`.
    async fn on_event(&self, event: &Event);

    /// Returns `false` for kinds this subscriber ignores.
    fn wants(&self, _kind: EventKind) -> bool {
        true
    }

    /// Name used in overflow and panic reports.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Capacity of this subscriber's queue (min 1).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
