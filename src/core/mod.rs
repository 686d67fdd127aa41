//! Scheduler core: registry, controller, drainer, selector and discovery.
//!
//! The only public API from this module is [`Scheduler`] (plus its builder,
//! [`Status`] snapshot and the [`Strategy`] label).
//!
//! Internal modules:
//! - [`registry`]: deduplicated FIFO of items with seen/processing/done counters;
//! - [`sampler`]: sliding window of activation latencies;
//! - [`balancer`]: feedback controller for concurrency, step and batch delay;
//! - [`selector`]: instant vs incremental decision and execution per item;
//! - [`drainer`]: batch activations, completion bookkeeping, release/notify;
//! - [`discovery`]: scope traversal, mutation listener, poll and heal cycles;
//! - [`periodic`]: cancellable timer shared by the discovery cycles;
//! - [`scheduler`]: the instance and its control surface.

mod balancer;
mod builder;
mod discovery;
mod drainer;
mod periodic;
mod registry;
mod sampler;
mod scheduler;
mod selector;

#[cfg(test)]
mod test_support;

pub use builder::SchedulerBuilder;
pub use scheduler::{Scheduler, Status};
pub use selector::Strategy;
