//! # Batch drainer: the scheduling loop.
//!
//! Two states, one scheduled activation at most:
//!
//! ```text
//!            schedule_drain() [running && pending && Idle]
//!     Idle ─────────────────────────────────────────────────► Scheduled
//!      ▲                                                          │
//!      └──────────────── activation starts ◄── spawned task ◄─────┘
//! ```
//!
//! An activation:
//! 1. records its start time;
//! 2. `capacity = concurrency - processing`, takes `min(capacity, concurrency)` items;
//! 3. spawns the selector for every taken item (completion re-triggers the drainer
//!    while work is pending);
//! 4. records its own elapsed time as a latency sample and retunes the balancer.
//!
//! ## Rules
//! - Never more than `concurrency` items taken per activation, never more than
//!   the free in-flight budget
//! - Triggers while `Scheduled` collapse into the pending activation
//! - The deferred continuation is a spawned task: it runs after the caller
//!   reaches a suspension point, never as a tight loop
//! - A panicking host adapter fails the item; it never leaks a `processing` slot

use std::sync::Arc;

use futures::FutureExt;
use tokio::time::Instant;

use crate::core::registry::Completion;
use crate::core::scheduler::Scheduler;
use crate::core::selector::{self, ItemResult, Outcome, Strategy};
use crate::error::ItemError;
use crate::events::{Event, EventKind};
use crate::host::ItemRef;

/// Drainer state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DrainState {
    /// No activation scheduled.
    Idle,
    /// One activation pending.
    Scheduled,
}

impl Scheduler {
    /// Schedules one activation unless one is pending already.
    pub(crate) fn schedule_drain(self: &Arc<Self>) {
        if !self.is_running() {
            return;
        }
        {
            let mut st = self.state.lock();
            if st.drain == DrainState::Scheduled || !st.registry.has_pending() {
                return;
            }
            st.drain = DrainState::Scheduled;
        }
        let me = Arc::clone(self);
        self.tracker.spawn(async move { me.activate() });
    }

    /// One drainer activation.
    fn activate(self: &Arc<Self>) {
        let start = Instant::now();
        let (taken, capacity) = {
            let mut st = self.state.lock();
            st.drain = DrainState::Idle;
            if !self.is_running() {
                return;
            }
            let concurrency = st.balancer.concurrency();
            let capacity = concurrency.saturating_sub(st.registry.processing());
            (st.registry.take_up_to(capacity.min(concurrency)), capacity)
        };

        let launched = taken.len();
        for item in taken {
            let me = Arc::clone(self);
            self.tracker.spawn(me.run_item(item));
        }

        let (retune, delay) = {
            let cfg = self.cfg.read();
            let now = Instant::now();
            let mut st = self.state.lock();
            st.sampler.record(now, now.saturating_duration_since(start));
            let avg = st.sampler.avg_ms(now);
            let retune = st.balancer.retune(avg, &cfg);
            (retune, st.balancer.batch_delay())
        };

        self.bus.publish(
            Event::new(EventKind::ActivationRan)
                .with_taken(launched)
                .with_capacity(capacity),
        );
        if retune.changed {
            self.bus.publish(
                Event::new(EventKind::Retuned)
                    .with_concurrency(retune.concurrency)
                    .with_avg_ms(retune.avg_ms)
                    .with_delay(delay),
            );
        }
        if launched == 0 && self.is_idle() {
            self.idle.notify_waiters();
        }
    }

    /// Runs the selector for one item and settles its bookkeeping.
    async fn run_item(self: Arc<Self>, item: ItemRef) {
        let id = item.id();
        let outcome = match std::panic::AssertUnwindSafe(selector::process(&self, &item))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(panic_err) => {
                let any = &*panic_err;
                let info = if let Some(msg) = any.downcast_ref::<&'static str>() {
                    (*msg).to_string()
                } else if let Some(msg) = any.downcast_ref::<String>() {
                    msg.clone()
                } else {
                    "unknown panic".to_string()
                };
                Outcome {
                    strategy: Strategy::Incremental,
                    result: ItemResult::Failed(ItemError::op("adapter", info)),
                }
            }
        };

        let how = match &outcome.result {
            ItemResult::Cancelled => Completion::Abandoned,
            ItemResult::Completed | ItemResult::Failed(_) => Completion::Done,
        };
        let (more, done, seen) = {
            let mut st = self.state.lock();
            st.registry.complete(id, how);
            (
                st.registry.has_pending(),
                st.registry.done(),
                st.registry.seen(),
            )
        };

        let ev = match outcome.result {
            ItemResult::Completed => Event::new(EventKind::ItemDone),
            ItemResult::Failed(e) => Event::new(EventKind::ItemFailed).with_reason(e.to_string()),
            ItemResult::Cancelled => Event::new(EventKind::ItemAbandoned),
        };
        self.bus
            .publish(ev.with_item(id).with_strategy(outcome.strategy));

        if how == Completion::Done {
            self.release_item(&item);
            self.notify_done(&item, done, seen);
        }

        if more {
            self.schedule_drain();
        } else if self.is_idle() {
            self.idle.notify_waiters();
        }
    }

    /// Asks the release collaborator to free the item's resources.
    fn release_item(&self, item: &ItemRef) {
        let policy = self.cfg.read().cleanup_policy();
        if let Err(e) = self.host.release.release(item.as_ref(), policy) {
            self.bus.publish(
                Event::new(EventKind::ReleaseFailed)
                    .with_item(item.id())
                    .with_reason(e.to_string()),
            );
        }
    }

    /// Fires the done notification, if enabled.
    fn notify_done(&self, item: &ItemRef, done: usize, seen: usize) {
        if !self.cfg.read().notify_on_done {
            return;
        }
        if let Some(notifier) = &self.host.notifier {
            notifier.notify(&format!("media {} finished ({done}/{seen})", item.id()));
        }
    }
}
