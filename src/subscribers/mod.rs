//! # Event subscribers.
//!
//! ```text
//!   Drainer/Selector/Discovery ── publish(Event) ──► Bus ──► listener ──► SubscriberSet
//!                                                                          │
//!                                                          ┌───────────────┼──────────┐
//!                                                          ▼               ▼          ▼
//!                                                      LogWriter        Metrics     Custom
//! ```
//!
//! - [`Subscribe`] the subscriber contract
//! - [`SubscriberSet`] non-blocking fan-out with per-subscriber queues
//! - [`LogWriter`] built-in subscriber rendering events through `tracing`
//!   (feature `logging`, muted while `Config::quiet`)

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod embedded;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
