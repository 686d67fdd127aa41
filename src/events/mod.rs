//! Runtime events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Scheduler` (control surface, drainer, discovery tasks),
//!   the strategy selector, and `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the scheduler's event listener (fans out to `SubscriberSet`)
//!   and any receiver obtained through `Scheduler::subscribe`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
