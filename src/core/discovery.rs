//! # Discovery feed: scope traversal, mutation listener, poll and heal cycles.
//!
//! ```text
//! MutationSource ──signal──► MutationSink ──► listener task ──┐
//! periodic poll (poll_interval + batch_delay, jittered) ──────┼──► scan() ──► discover_all(root) ──► enqueue_many
//! periodic heal (heal_interval): observer lost? reinstall ────┘
//! ```
//!
//! ## Rules
//! - Every trigger goes through the registry's idempotent enqueue: overlapping
//!   triggers never duplicate work
//! - An error in one scope is published as `DiscoveryFailed`; siblings and
//!   descendants of other scopes are still visited
//! - Scopes are visited depth-first in document order; each scope at most once
//! - All tasks exit when the runtime token is cancelled

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::select;

use crate::core::periodic;
use crate::core::scheduler::Scheduler;
use crate::error::DiscoveryError;
use crate::events::{Bus, Event, EventKind};
use crate::host::{ItemRef, ScopeRef};

/// Collects every item reachable from `root`, including nested scopes.
///
/// Items are deduplicated by id; failing scopes are reported on `bus` and skipped.
pub(crate) fn discover_all(root: &ScopeRef, bus: &Bus) -> Vec<ItemRef> {
    let mut items = Vec::new();
    let mut seen_items = HashSet::new();
    let mut seen_scopes = HashSet::new();
    let mut stack = vec![Arc::clone(root)];

    while let Some(scope) = stack.pop() {
        if !seen_scopes.insert(Arc::as_ptr(&scope) as *const () as usize) {
            continue;
        }
        match scope.items() {
            Ok(found) => items.extend(found.into_iter().filter(|i| seen_items.insert(i.id()))),
            Err(e) => publish_failure(bus, scope.label(), &e),
        }
        match scope.children() {
            Ok(children) => stack.extend(children.into_iter().rev()),
            Err(e) => publish_failure(bus, scope.label(), &e),
        }
    }
    items
}

fn publish_failure(bus: &Bus, scope: &str, err: &DiscoveryError) {
    bus.publish(
        Event::new(EventKind::DiscoveryFailed)
            .with_origin(scope)
            .with_reason(err.as_message()),
    );
}

impl Scheduler {
    /// Scans the scope tree and enqueues everything found.
    ///
    /// Returns the number of newly accepted items. A scheduler without a root
    /// scope, or a stopped one, accepts nothing.
    pub fn scan(self: &Arc<Self>) -> usize {
        if !self.is_running() {
            return 0;
        }
        let Some(root) = &self.host.root else {
            return 0;
        };
        let found = discover_all(root, &self.bus);
        self.enqueue_many(found)
    }

    /// Installs the observer and spawns the listener, poll and heal tasks.
    pub(crate) fn attach_feed(self: &Arc<Self>) {
        if self.host.root.is_none() {
            return;
        }
        if let Some(m) = &self.host.mutations {
            if let Err(e) = m.observe(self.sink.clone()) {
                self.bus.publish(
                    Event::new(EventKind::ObserverLost).with_reason(e.to_string()),
                );
            }
            self.spawn_mutation_listener();
            periodic::every(self, heal_period, Scheduler::heal_observer);
        }
        periodic::every(self, poll_period, |s| {
            s.scan();
        });
    }

    fn spawn_mutation_listener(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        let token = self.runtime_token.clone();
        let sink = self.sink.clone();

        self.tracker.spawn(async move {
            loop {
                select! {
                    _ = token.cancelled() => break,
                    _ = sink.changed() => {
                        let Some(s) = weak.upgrade() else { break };
                        s.scan();
                    }
                }
            }
        });
    }

    /// Reinstalls the mutation observer if it was torn down.
    fn heal_observer(self: &Arc<Self>) {
        let Some(m) = &self.host.mutations else {
            return;
        };
        if m.is_observing() {
            return;
        }
        match m.observe(self.sink.clone()) {
            Ok(()) => {
                self.bus.publish(Event::new(EventKind::ObserverHealed));
                // Nodes added while the observer was gone produced no signal.
                self.scan();
            }
            Err(e) => {
                self.bus.publish(
                    Event::new(EventKind::ObserverLost).with_reason(e.to_string()),
                );
            }
        }
    }
}

fn poll_period(s: &Scheduler) -> Duration {
    let (base, jitter) = {
        let cfg = s.cfg.read();
        (cfg.poll_interval, cfg.poll_jitter)
    };
    let delay = s.state.lock().balancer.batch_delay();
    jitter.apply(base + delay)
}

fn heal_period(s: &Scheduler) -> Duration {
    s.cfg.read().heal_interval
}
