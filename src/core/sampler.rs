//! # Latency sampler - sliding time window of activation durations.
//!
//! ```text
//!   record(now, d) ──► [ (t0,d0) (t1,d1) ... (tn,dn) ]  ◄── purge(now): drop t < now - window
//!                                                         ◄── avg_ms(now): purge, then mean
//! ```
//!
//! ## Rules
//! - Samples are appended in timestamp order (callers pass a monotonic `now`)
//! - Every mutating aggregate purges stale samples first
//! - `peek_avg_ms` is read-only: it skips stale samples without removing them

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

/// One activation latency measurement.
#[derive(Debug, Clone, Copy)]
struct LatencySample {
    at: Instant,
    took: Duration,
}

/// Time-windowed collection of latency samples.
pub(crate) struct LatencySampler {
    window: Duration,
    samples: VecDeque<LatencySample>,
}

impl LatencySampler {
    /// Creates an empty sampler retaining samples for `window`.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            samples: VecDeque::new(),
        }
    }

    /// Changes the window; takes effect at the next purge.
    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }

    /// Appends a sample taken at `at`.
    pub fn record(&mut self, at: Instant, took: Duration) {
        self.samples.push_back(LatencySample { at, took });
    }

    /// Drops samples older than `now - window`.
    pub fn purge(&mut self, now: Instant) {
        let Some(cutoff) = now.checked_sub(self.window) else {
            return;
        };
        while self.samples.front().is_some_and(|s| s.at < cutoff) {
            self.samples.pop_front();
        }
    }

    /// Purges, then returns the mean duration in milliseconds (0 if empty).
    pub fn avg_ms(&mut self, now: Instant) -> f64 {
        self.purge(now);
        mean_ms(self.samples.iter())
    }

    /// Mean over in-window samples without mutating (0 if empty).
    pub fn peek_avg_ms(&self, now: Instant) -> f64 {
        let cutoff = now.checked_sub(self.window);
        mean_ms(
            self.samples
                .iter()
                .filter(|s| cutoff.is_none_or(|c| s.at >= c)),
        )
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.samples.len()
    }
}

fn mean_ms<'a>(samples: impl Iterator<Item = &'a LatencySample>) -> f64 {
    let (sum, n) = samples.fold((0.0_f64, 0_u32), |(sum, n), s| {
        (sum + s.took.as_secs_f64() * 1000.0, n + 1)
    });
    if n == 0 { 0.0 } else { sum / f64::from(n) }
}
