//! # Scheduler: owns the work registry, the controller and the discovery feed.
//!
//! The [`Scheduler`] is the explicit instance holding every piece of state; several
//! schedulers (one per document) are fully independent.
//!
//! ## Key responsibilities
//! - accept items (discovery or manual [`Scheduler::enqueue`]) into the registry
//! - drive the batch drainer (`core::drainer`) and the strategy selector
//! - attach/detach the discovery feed (`core::discovery`)
//! - expose the control surface: [`start`](Scheduler::start), [`stop`](Scheduler::stop),
//!   [`status`](Scheduler::status), [`config`](Scheduler::config) /
//!   [`update_config`](Scheduler::update_config)
//!
//! ## High-level architecture
//! ```text
//!   Scope tree ──scan──┐     MutationSink ──signal──► listener ──scan──┐
//!   poll (periodic) ───┼──────────────────────────────────────────────┴──► enqueue ──► WorkRegistry
//!   heal (periodic) ───┘ (reinstalls observer)                                           │
//!                                                                          schedule_drain (idempotent)
//!                                                                                        ▼
//!                                                      activation: take ≤ capacity ──► spawn selector per item
//!                                                            │                               │
//!                                                 LatencySampler ──► Balancer          complete ──► release/notify
//!                                                                                            └──► re-schedule if pending
//! Event flow:
//!   every stage ── publish(Event) ──► Bus ──► listener ──► SubscriberSet ──► LogWriter / custom
//! ```
//!
//! ## Stop semantics
//! `stop()` flips the running flag, cancels the runtime token (periodic tasks and
//! listeners exit), disconnects the mutation source and clears pending work.
//! Items in flight finish on their own; the incremental loop notices the flag at
//! its next iteration and abandons the item.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::select;
use tokio::sync::{Notify as IdleNotify, broadcast};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::config::Config;
use crate::core::balancer::Balancer;
use crate::core::builder::SchedulerBuilder;
use crate::core::drainer::DrainState;
use crate::core::registry::WorkRegistry;
use crate::core::sampler::LatencySampler;
use crate::error::ConfigError;
use crate::events::{Bus, Event, EventKind};
use crate::host::{ItemRef, MutationSink, MutationSource, Notify, Release, ScopeRef};
use crate::subscribers::SubscriberSet;

/// Mutable scheduler state; every access is one short, non-suspending critical section.
pub(crate) struct State {
    pub registry: WorkRegistry,
    pub sampler: LatencySampler,
    pub balancer: Balancer,
    pub drain: DrainState,
}

/// External collaborators.
pub(crate) struct Host {
    pub root: Option<ScopeRef>,
    pub mutations: Option<Arc<dyn MutationSource>>,
    pub release: Arc<dyn Release>,
    pub notifier: Option<Arc<dyn Notify>>,
}

/// Read-only snapshot returned by [`Scheduler::status`].
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    /// False once [`Scheduler::stop`] ran (and before [`Scheduler::start`]).
    pub running: bool,
    /// Current concurrency limit.
    pub concurrency: usize,
    /// Items waiting in the registry.
    pub queue_length: usize,
    /// Items in flight.
    pub processing: usize,
    /// Items marked done.
    pub done: usize,
    /// Items ever accepted (upper bound of the three above).
    pub seen: usize,
    /// Windowed average activation latency in milliseconds.
    pub avg_work_ms: f64,
    /// Current incremental step in seconds.
    pub step: f64,
    /// Current advisory batch delay.
    pub batch_delay: Duration,
    /// Current instant-strategy success estimate.
    pub success_rate: f64,
}

/// Adaptive, self-throttling media work scheduler.
///
/// Built with [`Scheduler::builder`]; always handled as `Arc<Scheduler>`.
pub struct Scheduler {
    pub(crate) cfg: RwLock<Config>,
    pub(crate) state: Mutex<State>,
    pub(crate) bus: Bus,
    pub(crate) host: Host,
    pub(crate) sink: MutationSink,
    pub(crate) runtime_token: CancellationToken,
    pub(crate) tracker: TaskTracker,
    pub(crate) idle: IdleNotify,
    running: AtomicBool,
    started: AtomicBool,
    log_muted: Arc<AtomicBool>,
    listener_token: CancellationToken,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl Scheduler {
    /// Returns a builder for a scheduler with the given configuration.
    pub fn builder(cfg: Config) -> SchedulerBuilder {
        SchedulerBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: Config,
        bus: Bus,
        host: Host,
        log_muted: Arc<AtomicBool>,
    ) -> Self {
        let state = State {
            registry: WorkRegistry::new(),
            sampler: LatencySampler::new(cfg.adapt_window),
            balancer: Balancer::new(&cfg),
            drain: DrainState::Idle,
        };
        Self {
            cfg: RwLock::new(cfg),
            state: Mutex::new(state),
            bus,
            host,
            sink: MutationSink::new(),
            runtime_token: CancellationToken::new(),
            tracker: TaskTracker::new(),
            idle: IdleNotify::new(),
            running: AtomicBool::new(false),
            started: AtomicBool::new(false),
            log_muted,
            listener_token: CancellationToken::new(),
            listener: Mutex::new(None),
        }
    }

    /// Spawns the event listener: forwards bus events to `set` until the
    /// listener token is cancelled, then drains what is buffered and shuts the
    /// set down (queues flushed, workers joined).
    ///
    /// The listener outlives `stop()` so events published while stopping still
    /// reach subscribers; [`shutdown`](Self::shutdown) or dropping the scheduler
    /// ends it.
    pub(crate) fn subscriber_listener(&self, set: SubscriberSet) {
        let mut rx = self.bus.subscribe();
        let token = self.listener_token.clone();

        let handle = tokio::spawn(async move {
            loop {
                select! {
                    biased;
                    res = rx.recv() => match res {
                        Ok(ev) => set.emit(&ev),
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            tracing::warn!(skipped = n, "event listener lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    _ = token.cancelled() => {
                        loop {
                            match rx.try_recv() {
                                Ok(ev) => set.emit(&ev),
                                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                                Err(_) => break,
                            }
                        }
                        break;
                    }
                }
            }
            drop(rx);
            set.shutdown().await;
        });
        *self.listener.lock() = Some(handle);
    }

    /// Starts the scheduler: marks it running, attaches the discovery feed and
    /// runs an initial scan.
    ///
    /// Idempotent; a stopped scheduler cannot be restarted.
    pub fn start(self: &Arc<Self>) {
        if self.runtime_token.is_cancelled() || self.started.swap(true, Ordering::SeqCst) {
            return;
        }
        self.running.store(true, Ordering::SeqCst);
        self.bus.publish(Event::new(EventKind::SchedulerStarted));
        self.attach_feed();
        self.scan();
    }

    /// Stops the scheduler.
    ///
    /// - no new activations or enqueues are accepted
    /// - periodic tasks and the mutation listener exit, the observer is disconnected
    /// - pending work is cleared (counters are kept)
    /// - in-flight items finish naturally; incremental runs exit at their next step
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        self.runtime_token.cancel();
        if let Some(m) = &self.host.mutations {
            m.disconnect();
        }

        let (dropped, idle) = {
            let mut st = self.state.lock();
            let dropped = st.registry.clear_pending();
            (dropped, st.registry.processing() == 0)
        };
        self.bus
            .publish(Event::new(EventKind::StopRequested).with_taken(dropped));
        if idle {
            self.idle.notify_waiters();
        }
    }

    /// Stops the scheduler, waits for every in-flight item and background task,
    /// then flushes and joins the subscribers.
    pub async fn shutdown(&self) {
        self.stop();
        self.tracker.close();
        self.tracker.wait().await;

        self.listener_token.cancel();
        let listener = self.listener.lock().take();
        if let Some(handle) = listener {
            let _ = handle.await;
        }
    }

    /// True between [`start`](Self::start) and [`stop`](Self::stop).
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Returns a read-only snapshot of counters and controller state.
    pub fn status(&self) -> Status {
        let now = Instant::now();
        let st = self.state.lock();
        Status {
            running: self.is_running(),
            concurrency: st.balancer.concurrency(),
            queue_length: st.registry.pending_len(),
            processing: st.registry.processing(),
            done: st.registry.done(),
            seen: st.registry.seen(),
            avg_work_ms: st.sampler.peek_avg_ms(now),
            step: st.balancer.step(),
            batch_delay: st.balancer.batch_delay(),
            success_rate: st.balancer.success_rate(),
        }
    }

    /// Returns a copy of the current configuration.
    pub fn config(&self) -> Config {
        self.cfg.read().clone()
    }

    /// Applies `f` to a copy of the configuration, validates it and installs it.
    ///
    /// The controller state is re-clamped to the new bounds, the sampler window
    /// follows `adapt_window` and `quiet` mutes or unmutes the built-in log
    /// subscriber. `bus_capacity` only takes effect at build time.
    ///
    /// # Example
    /// ```no_run
    /// # async fn demo(sched: std::sync::Arc<drainvisor::Scheduler>) {
    /// sched
    ///     .update_config(|cfg| cfg.concurrency_max = 2)
    ///     .expect("valid bounds");
    /// # }
    /// ```
    pub fn update_config(&self, f: impl FnOnce(&mut Config)) -> Result<(), ConfigError> {
        let mut cfg = self.cfg.write();
        let mut next = cfg.clone();
        f(&mut next);
        next.validate()?;

        let mut st = self.state.lock();
        st.balancer.clamp_to(&next);
        st.sampler.set_window(next.adapt_window);
        self.log_muted.store(next.quiet, Ordering::Relaxed);
        *cfg = next;
        Ok(())
    }

    /// Pushes one item into the registry (same path as discovery).
    ///
    /// Returns `false` if the scheduler is not running or the item is already
    /// pending, in flight or done.
    pub fn enqueue(self: &Arc<Self>, item: ItemRef) -> bool {
        self.enqueue_many(std::iter::once(item)) == 1
    }

    /// Pushes several items; returns how many were accepted.
    pub(crate) fn enqueue_many(self: &Arc<Self>, items: impl IntoIterator<Item = ItemRef>) -> usize {
        if !self.is_running() {
            return 0;
        }
        let accepted: Vec<_> = {
            let mut st = self.state.lock();
            items
                .into_iter()
                .filter_map(|item| {
                    let id = item.id();
                    st.registry.enqueue(item).then_some(id)
                })
                .collect()
        };
        let n = accepted.len();
        self.bus.publish_all(
            accepted
                .into_iter()
                .map(|id| Event::new(EventKind::ItemQueued).with_item(id)),
        );
        self.schedule_drain();
        n
    }

    /// Creates a receiver observing subsequent runtime events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Resolves once nothing is pending and nothing is in flight.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if self.is_idle() {
                return;
            }
            notified.await;
        }
    }

    pub(crate) fn is_idle(&self) -> bool {
        let st = self.state.lock();
        !st.registry.has_pending() && st.registry.processing() == 0
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.runtime_token.cancel();
        self.listener_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn quiet_follows_live_updates() {
        let sched = Scheduler::builder(Config::default())
            .build()
            .expect("valid config");
        assert!(!sched.log_muted.load(Ordering::Relaxed));

        sched
            .update_config(|cfg| cfg.quiet = true)
            .expect("valid update");
        assert!(sched.log_muted.load(Ordering::Relaxed));

        sched
            .update_config(|cfg| cfg.quiet = false)
            .expect("valid update");
        assert!(!sched.log_muted.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn shutdown_joins_the_listener() {
        let sched = Scheduler::builder(Config::default())
            .build()
            .expect("valid config");
        sched.start();
        sched.shutdown().await;
        assert!(sched.listener.lock().is_none());
    }
}
