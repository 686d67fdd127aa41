//! # drainvisor
//!
//! **Drainvisor** is an adaptive, self-throttling scheduler that drives media
//! items (audio/video-element-like objects exposed by a host adapter) to their
//! terminal state as quickly as the host tolerates.
//!
//! It discovers items across a tree of scopes, keeps a deduplicated FIFO of work,
//! and processes items in batches whose size follows a feedback controller on
//! observed activation latency. Each item is either jumped straight to its end
//! (instant) or advanced in bounded, cooperatively yielding steps (incremental).
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌────────────────┐   ┌──────────────┐
//!     │  Scope tree  │   │ MutationSource │   │   enqueue()  │
//!     │ (scan/poll)  │   │ (listener/heal)│   │   (manual)   │
//!     └──────┬───────┘   └───────┬────────┘   └──────┬───────┘
//!            ▼                   ▼                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Scheduler                                                        │
//! │  - WorkRegistry (FIFO + queued/in-flight/finished sets)           │
//! │  - LatencySampler + Balancer (concurrency, step, batch delay)     │
//! │  - Drainer (one scheduled activation at most)                     │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  selector    │   │  selector    │   │  selector    │
//!     │ (item #1)    │   │ (item #2)    │   │ (item #3)    │
//!     └┬─────────────┘   └┬─────────────┘   └┬─────────────┘
//!      │ ItemStarting     │ InstantFailed    │ ItemDone
//!      ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │                   (capacity: Config::bus_capacity)                │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │  subscriber_listener   │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                             SubscriberSet
//!                          ┌────────┼────────┐
//!                          ▼        ▼        ▼
//!                      LogWriter  sub2     subN
//! ```
//!
//! ### Item lifecycle
//! ```text
//! discovered ──► pending ──► in flight ──┬─► done (completed or failed) ──► release ──► notify
//!                                        └─► abandoned (scheduler stopped mid-flight)
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                         |
//! |-------------------|--------------------------------------------------------------|--------------------------------------------|
//! | **Scheduling**    | Start/stop, manual enqueue, status snapshot, live retuning.  | [`Scheduler`], [`Status`]                  |
//! | **Host adapter**  | Media items, scopes, mutation feed, release, notifications.  | [`MediaItem`], [`Scope`], [`MutationSource`] |
//! | **Subscriber API**| Hook into runtime events (logging, metrics, custom).         | [`Subscribe`], [`Event`]                   |
//! | **Policies**      | Resource cleanup and poll jitter.                            | [`CleanupPolicy`], [`JitterPolicy`]        |
//! | **Errors**        | Typed, non-fatal errors per subsystem.                       | [`ItemError`], [`ConfigError`]             |
//! | **Configuration** | Centralized tunables.                                        | [`Config`]                                 |
//!
//! ## Optional features
//! - `logging` (default): exports the built-in [`LogWriter`], always installed; muted while `Config::quiet`.
//!
//! ## Example
//! ```rust
//! use drainvisor::{Config, Scheduler};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config {
//!         quiet: true,
//!         ..Config::default()
//!     };
//!     let sched = Scheduler::builder(cfg).build()?;
//!     sched.start();
//!
//!     // Items come from the host adapter: `sched.enqueue(Arc::new(MyItem::new(..)))`.
//!     sched.wait_idle().await;
//!     assert_eq!(sched.status().done, 0);
//!
//!     sched.shutdown().await;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod host;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use config::Config;
pub use core::{Scheduler, SchedulerBuilder, Status, Strategy};
pub use error::{ConfigError, DiscoveryError, ItemError, ObserveError};
pub use events::{Bus, Event, EventKind};
pub use host::{
    ItemId, ItemRef, LiveStream, MediaItem, MutationSink, MutationSource, Notify, Release, Scope,
    ScopeRef, Signal, Source, SourceRelease, TransientUrl,
};
pub use policies::{CleanupPolicy, JitterPolicy};
pub use subscribers::{Subscribe, SubscriberSet};

#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
