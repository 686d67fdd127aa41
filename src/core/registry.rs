//! # Work registry - deduplicated FIFO of discovered items.
//!
//! Tracks every item the scheduler has accepted and where it currently is:
//!
//! ```text
//! enqueue(item) ──► pending (VecDeque, FIFO) ──take_up_to(n)──► in-flight ──complete()──► done
//!                        │                                           │
//!                        └── clear_pending() (stop)                  └── Abandoned (stop) ─► forgotten
//! ```
//!
//! ## Rules
//! - An id is in at most one of {pending, in-flight, done}
//! - `done` is monotonic: a done id is never re-enqueued
//! - `seen >= pending + processing + done` at all times
//! - All operations are total (no error conditions)

use std::collections::{HashSet, VecDeque};

use crate::host::{ItemId, ItemRef};

/// How an in-flight item left the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Completion {
    /// Finished (success or failure): marked done.
    Done,
    /// Dropped mid-flight by a stop; not marked done.
    Abandoned,
}

/// Deduplicated, insertion-ordered set of items not yet completed.
#[derive(Default)]
pub(crate) struct WorkRegistry {
    pending: VecDeque<ItemRef>,
    queued: HashSet<ItemId>,
    in_flight: HashSet<ItemId>,
    finished: HashSet<ItemId>,

    processing: usize,
    done: usize,
    seen: usize,
}

impl WorkRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `item` unless it is already pending, in flight, or done.
    ///
    /// Returns `true` if the item was accepted.
    pub fn enqueue(&mut self, item: ItemRef) -> bool {
        let id = item.id();
        if self.queued.contains(&id) || self.in_flight.contains(&id) || self.finished.contains(&id)
        {
            return false;
        }
        self.queued.insert(id);
        self.pending.push_back(item);
        self.seen = self
            .seen
            .max(self.pending.len() + self.processing + self.done);
        true
    }

    /// Removes and returns at most `n` pending items in FIFO order.
    ///
    /// Items already marked done are discarded on the way. Returned items are
    /// moved to the in-flight set and counted in `processing`.
    pub fn take_up_to(&mut self, n: usize) -> Vec<ItemRef> {
        let mut out = Vec::with_capacity(n.min(self.pending.len()));
        while out.len() < n {
            let Some(item) = self.pending.pop_front() else {
                break;
            };
            let id = item.id();
            self.queued.remove(&id);
            if self.finished.contains(&id) {
                continue;
            }
            self.in_flight.insert(id);
            self.processing += 1;
            out.push(item);
        }
        out
    }

    /// Moves an in-flight item out of flight.
    ///
    /// Unknown ids are ignored, so completing twice is harmless.
    pub fn complete(&mut self, id: ItemId, how: Completion) {
        if !self.in_flight.remove(&id) {
            return;
        }
        self.processing -= 1;
        if how == Completion::Done && self.finished.insert(id) {
            self.done += 1;
        }
    }

    /// Drops every pending item; returns how many were dropped.
    pub fn clear_pending(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        self.queued.clear();
        n
    }

    /// True if `id` was marked done.
    #[cfg(test)]
    pub fn is_done(&self, id: ItemId) -> bool {
        self.finished.contains(&id)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn processing(&self) -> usize {
        self.processing
    }

    pub fn done(&self) -> usize {
        self.done
    }

    pub fn seen(&self) -> usize {
        self.seen
    }
}
