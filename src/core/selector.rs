//! # Hybrid strategy selector - drives one item to its end.
//!
//! Picks a strategy per item and runs it:
//!
//! ```text
//! ready = ready_state >= prefer_instant_ready_state
//! rate  = (success + 1) / (success + failure + 2)
//!
//! ready && rate > 0.4 ──► instant: mute → pause → seek(end) → terminal signals
//!        │                   ├─ Ok  ──► success += 1 ─────────────────────────► Completed
//!        │                   └─ Err ──► failure += 1, InstantFailed ──┐
//!        └─ otherwise ───────────────────────────────────────────────┴──► incremental:
//!                                                                          mute, pause (refusal ──► PrepareFailed)
//!                                                                          loop {
//!                                                                            stopped? ──► Cancelled
//!                                                                            seek(min(pos + step, end))
//!                                                                            remaining ≤ 0.5 ──► terminal signals, Completed
//!                                                                            yield_now()
//!                                                                          }
//!                                                                          step error ──► Failed
//! ```
//!
//! ## Rules
//! - Instant failure falls through to incremental **for the same item** (no re-dispatch)
//! - The incremental loop yields once per step, so it never monopolizes the runtime
//! - Stop is observed at the top of every incremental iteration (cooperative)
//! - The success-rate estimator is shared by all items of one scheduler

use std::fmt;

use crate::core::scheduler::Scheduler;
use crate::error::ItemError;
use crate::events::{Event, EventKind};
use crate::host::{ItemRef, MediaItem, Signal, known_duration};

/// Success rate the instant strategy must beat.
const INSTANT_MIN_SUCCESS: f64 = 0.4;
/// Distance kept from the end when seeking there.
const END_MARGIN: f64 = 0.001;
/// Remaining duration under which an item counts as finished.
const END_EPSILON: f64 = 0.5;
/// Seek target for items with unknown duration (instant path).
const UNKNOWN_END: f64 = 1e9;
/// Step for items with unknown duration (incremental path).
const UNKNOWN_STEP: f64 = 3600.0;

/// Processing strategy for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Jump straight to the end.
    Instant,
    /// Advance in bounded steps with cooperative yielding.
    Incremental,
}

impl Strategy {
    /// Short stable name (for logs/metrics).
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Instant => "instant",
            Strategy::Incremental => "incremental",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How processing of one item ended.
#[derive(Debug)]
pub(crate) enum ItemResult {
    /// Terminal state reached.
    Completed,
    /// A step failed; the item is still finished.
    Failed(ItemError),
    /// The scheduler stopped mid-flight.
    Cancelled,
}

/// Strategy that ran last plus its result.
#[derive(Debug)]
pub(crate) struct Outcome {
    pub strategy: Strategy,
    pub result: ItemResult,
}

/// Chooses a strategy for `item` and runs it to the end.
///
/// Never returns an error: failures are folded into [`ItemResult::Failed`] and
/// published as events.
pub(crate) async fn process(sched: &Scheduler, item: &ItemRef) -> Outcome {
    let (threshold, max_steps) = {
        let cfg = sched.cfg.read();
        (cfg.prefer_instant_ready_state, cfg.incremental_max_steps)
    };
    let id = item.id();
    let ready = item.ready_state() >= threshold;
    let rate = sched.state.lock().balancer.success_rate();

    if ready && rate > INSTANT_MIN_SUCCESS {
        sched.bus.publish(
            Event::new(EventKind::ItemStarting)
                .with_item(id)
                .with_strategy(Strategy::Instant),
        );
        match run_instant(item.as_ref()) {
            Ok(()) => {
                sched.state.lock().balancer.record_instant(true);
                return Outcome {
                    strategy: Strategy::Instant,
                    result: ItemResult::Completed,
                };
            }
            Err(e) => {
                sched.state.lock().balancer.record_instant(false);
                sched.bus.publish(
                    Event::new(EventKind::InstantFailed)
                        .with_item(id)
                        .with_reason(e.to_string()),
                );
            }
        }
    } else {
        sched.bus.publish(
            Event::new(EventKind::ItemStarting)
                .with_item(id)
                .with_strategy(Strategy::Incremental),
        );
    }

    Outcome {
        strategy: Strategy::Incremental,
        result: run_incremental(sched, item.as_ref(), max_steps).await,
    }
}

/// Instant strategy: mute, pause, seek to the end, dispatch terminal signals.
pub(crate) fn run_instant(item: &dyn MediaItem) -> Result<(), ItemError> {
    item.set_muted(true)?;
    item.pause()?;
    let end = known_duration(item.duration()).map_or(UNKNOWN_END, |d| (d - END_MARGIN).max(0.0));
    item.set_position(end)?;
    dispatch_terminal(item)
}

/// Incremental strategy: step towards the end, yielding after each step.
async fn run_incremental(sched: &Scheduler, item: &dyn MediaItem, max_steps: u32) -> ItemResult {
    for prepared in [item.set_muted(true), item.pause()] {
        if let Err(e) = prepared {
            sched.bus.publish(
                Event::new(EventKind::PrepareFailed)
                    .with_item(item.id())
                    .with_reason(e.to_string()),
            );
        }
    }

    for _ in 0..max_steps {
        if !sched.is_running() {
            return ItemResult::Cancelled;
        }
        let step = sched.state.lock().balancer.step();
        match step_once(item, step) {
            Ok(true) => return ItemResult::Completed,
            Ok(false) => {}
            Err(e) => return ItemResult::Failed(e),
        }
        tokio::task::yield_now().await;
    }

    match dispatch_terminal(item) {
        Ok(()) => ItemResult::Completed,
        Err(e) => ItemResult::Failed(e),
    }
}

/// Advances `item` by one step; returns `true` once the end is reached.
pub(crate) fn step_once(item: &dyn MediaItem, step: f64) -> Result<bool, ItemError> {
    let pos = item.position();
    match known_duration(item.duration()) {
        Some(duration) => {
            let end = (duration - END_MARGIN).max(0.0);
            let target = (pos + step).min(end);
            item.set_position(target)?;
            if duration - target <= END_EPSILON {
                dispatch_terminal(item)?;
                return Ok(true);
            }
            Ok(false)
        }
        None => {
            item.set_position(pos + UNKNOWN_STEP)?;
            Ok(false)
        }
    }
}

fn dispatch_terminal(item: &dyn MediaItem) -> Result<(), ItemError> {
    for signal in Signal::TERMINAL {
        item.dispatch(signal)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::StubItem;

    #[test]
    fn instant_seeks_just_before_end() {
        let item = StubItem::new(1, 3, 10.0);
        run_instant(&item).expect("instant");

        assert!((item.position() - 9.999).abs() < 1e-9);
        assert!(item.is_muted());
        assert!(item.is_paused());
        assert_eq!(item.signals(), Signal::TERMINAL.to_vec());
    }

    #[test]
    fn instant_uses_sentinel_for_unknown_duration() {
        let item = StubItem::new(1, 4, f64::INFINITY);
        run_instant(&item).expect("instant");
        assert_eq!(item.position(), UNKNOWN_END);
    }

    #[test]
    fn instant_error_stops_before_signals() {
        let item = StubItem::new(1, 4, 10.0).failing_seeks();
        assert!(run_instant(&item).is_err());
        assert!(item.signals().is_empty());
    }

    #[test]
    fn incremental_steps_clamp_to_end() {
        let item = StubItem::new(1, 0, 100.0);

        assert!(!step_once(&item, 50.0).expect("step 1"));
        assert_eq!(item.position(), 50.0);
        assert!(item.signals().is_empty());

        assert!(step_once(&item, 50.0).expect("step 2"));
        assert!((item.position() - 99.999).abs() < 1e-9);
        assert_eq!(item.signals(), Signal::TERMINAL.to_vec());
    }

    #[test]
    fn incremental_unknown_duration_uses_fixed_increment() {
        let item = StubItem::new(1, 0, f64::NAN);
        assert!(!step_once(&item, 50.0).expect("step"));
        assert_eq!(item.position(), UNKNOWN_STEP);
    }

    #[test]
    fn short_items_finish_in_one_step() {
        let item = StubItem::new(1, 0, 0.0005);
        assert!(step_once(&item, 30.0).expect("step"));
        assert_eq!(item.position(), 0.0);
    }

    #[test]
    fn strategy_names() {
        assert_eq!(Strategy::Instant.to_string(), "instant");
        assert_eq!(Strategy::Incremental.as_str(), "incremental");
    }
}
