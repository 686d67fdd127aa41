//! # LogWriter: tracing event renderer
//!
//! A subscriber that renders incoming [`Event`]s as structured `tracing` records
//! under the `drainvisor` target. The host application chooses the tracing
//! subscriber (fmt, json, ...); this crate never installs one.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO drainvisor: started
//! DEBUG drainvisor: activation taken=4 capacity=4
//! INFO drainvisor: done item=#3 strategy=instant
//! WARN drainvisor: instant failed, falling back item=#5 err="set_position failed: not seekable"
//! DEBUG drainvisor: retuned concurrency=5 avg_ms=0.02 delay_ms=45
//! WARN drainvisor: scope failed scope="iframe#ads" err="cross-origin"
//! INFO drainvisor: stop requested dropped=2
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
///
/// Skips every event while its muted flag is set; the scheduler shares that
/// flag with `Config::quiet`.
#[derive(Default)]
pub struct LogWriter {
    muted: Arc<AtomicBool>,
}

impl LogWriter {
    /// Construct a new, unmuted [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn muted_by(muted: Arc<AtomicBool>) -> Self {
        Self { muted }
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let item = e.item.map(|id| id.to_string()).unwrap_or_default();
        let strategy = e.strategy.map(|s| s.as_str()).unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::SchedulerStarted => {
                info!(target: "drainvisor", "started");
            }
            EventKind::StopRequested => {
                info!(target: "drainvisor", dropped = ?e.taken, "stop requested");
            }
            EventKind::ItemQueued => {
                debug!(target: "drainvisor", %item, "queued");
            }
            EventKind::ItemStarting => {
                debug!(target: "drainvisor", %item, strategy, "starting");
            }
            EventKind::InstantFailed => {
                warn!(target: "drainvisor", %item, err = reason, "instant failed, falling back");
            }
            EventKind::PrepareFailed => {
                debug!(target: "drainvisor", %item, err = reason, "mute/pause refused, stepping anyway");
            }
            EventKind::ItemDone => {
                info!(target: "drainvisor", %item, strategy, "done");
            }
            EventKind::ItemFailed => {
                warn!(target: "drainvisor", %item, strategy, err = reason, "failed, marked done");
            }
            EventKind::ItemAbandoned => {
                info!(target: "drainvisor", %item, strategy, "abandoned on stop");
            }
            EventKind::ReleaseFailed => {
                warn!(target: "drainvisor", %item, err = reason, "release failed");
            }
            EventKind::ActivationRan => {
                debug!(target: "drainvisor", taken = ?e.taken, capacity = ?e.capacity, "activation");
            }
            EventKind::Retuned => {
                debug!(
                    target: "drainvisor",
                    concurrency = ?e.concurrency,
                    avg_ms = ?e.avg_ms,
                    delay_ms = ?e.delay_ms,
                    "retuned"
                );
            }
            EventKind::DiscoveryFailed => {
                warn!(
                    target: "drainvisor",
                    scope = e.origin.as_deref().unwrap_or("unknown"),
                    err = reason,
                    "scope failed"
                );
            }
            EventKind::ObserverLost => {
                warn!(target: "drainvisor", err = reason, "mutation observer lost");
            }
            EventKind::ObserverHealed => {
                info!(target: "drainvisor", "mutation observer reinstalled");
            }
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => {
                warn!(
                    target: "drainvisor",
                    subscriber = e.origin.as_deref().unwrap_or("unknown"),
                    info = reason,
                    "subscriber trouble"
                );
            }
        }
    }

    fn wants(&self, _kind: EventKind) -> bool {
        !self.muted.load(Ordering::Relaxed)
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn muted_flag_is_read_on_every_event() {
        let flag = Arc::new(AtomicBool::new(false));
        let writer = LogWriter::muted_by(Arc::clone(&flag));
        assert!(writer.wants(EventKind::ItemDone));

        flag.store(true, Ordering::Relaxed);
        assert!(!writer.wants(EventKind::ItemDone));
        assert!(!writer.wants(EventKind::SchedulerStarted));

        flag.store(false, Ordering::Relaxed);
        assert!(writer.wants(EventKind::ItemDone));
    }
}
