//! # Cancellable periodic timer.
//!
//! One abstraction behind both discovery timers (poll and observer heal):
//!
//! ```text
//! loop {
//!   ├─► period(&sched)           (re-evaluated every round: pacing may change)
//!   ├─► sleep(period) ──────────── runtime_token cancelled ──► exit
//!   └─► tick(&sched)
//! }
//! ```
//!
//! The task holds only a `Weak<Scheduler>`: dropping the last scheduler handle ends
//! the loop at its next round even if `stop()` was never called.

use std::sync::Arc;
use std::time::Duration;

use tokio::{select, time};

use crate::core::scheduler::Scheduler;

/// Spawns a periodic task on the scheduler's tracker.
pub(crate) fn every(
    sched: &Arc<Scheduler>,
    period: fn(&Scheduler) -> Duration,
    tick: fn(&Arc<Scheduler>),
) {
    let weak = Arc::downgrade(sched);
    let token = sched.runtime_token.clone();

    sched.tracker.spawn(async move {
        loop {
            let Some(delay) = weak.upgrade().map(|s| period(&s)) else {
                break;
            };
            let sleep = time::sleep(delay);
            tokio::pin!(sleep);
            select! {
                _ = &mut sleep => {}
                _ = token.cancelled() => break,
            }
            let Some(s) = weak.upgrade() else {
                break;
            };
            tick(&s);
        }
    });
}
