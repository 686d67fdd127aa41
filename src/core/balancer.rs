//! # Dynamic balancer - windowed feedback controller.
//!
//! Retunes three knobs once per drainer activation from the latency window:
//!
//! ```text
//!               avg < target            target ≤ avg ≤ 1.8·target         avg > 1.8·target
//! concurrency   +1 (≤ max)              unchanged (dead band)             -1 (≥ min)
//!
//!               success_rate > 0.6      otherwise
//! step          step_max                step_base
//!
//!               avg > 2·target          otherwise
//! batch_delay   ×1.5 (≤ delay_max)      ×0.9 (≥ delay_min)
//! ```
//!
//! The success rate is a Laplace-smoothed estimate shared by all items:
//! `(success + 1) / (success + failure + 2)`, starting at 0.5.

use std::time::Duration;

use crate::config::Config;

/// Upper edge of the dead band, as a multiple of the target.
const SHRINK_FACTOR: f64 = 1.8;
/// Latency multiple above which the batch delay backs off.
const BACKOFF_FACTOR: f64 = 2.0;
/// Success rate above which the larger step is used.
const HIGH_SUCCESS: f64 = 0.6;

/// Result of one retune pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Retune {
    pub avg_ms: f64,
    pub concurrency: usize,
    pub changed: bool,
}

/// Controller state.
#[derive(Debug, Clone)]
pub(crate) struct Balancer {
    concurrency: usize,
    step: f64,
    batch_delay: Duration,
    ready_success: u64,
    ready_failure: u64,
}

impl Balancer {
    /// Creates the controller at the configured initial values.
    pub fn new(cfg: &Config) -> Self {
        let mut b = Self {
            concurrency: cfg.concurrency_init,
            step: cfg.step_base,
            batch_delay: cfg.batch_delay_init,
            ready_success: 0,
            ready_failure: 0,
        };
        b.clamp_to(cfg);
        b
    }

    /// Smoothed instant-strategy success rate.
    pub fn success_rate(&self) -> f64 {
        (self.ready_success as f64 + 1.0) / ((self.ready_success + self.ready_failure) as f64 + 2.0)
    }

    /// Records the outcome of one instant-strategy attempt.
    pub fn record_instant(&mut self, ok: bool) {
        if ok {
            self.ready_success += 1;
        } else {
            self.ready_failure += 1;
        }
    }

    /// Applies one controller pass for the windowed average `avg_ms`.
    pub fn retune(&mut self, avg_ms: f64, cfg: &Config) -> Retune {
        let target = cfg.target_work_ms();
        let before = self.concurrency;

        if avg_ms < target {
            self.concurrency = self.concurrency.saturating_add(1);
        } else if avg_ms > target * SHRINK_FACTOR {
            self.concurrency = self.concurrency.saturating_sub(1);
        }

        self.step = if self.success_rate() > HIGH_SUCCESS {
            cfg.step_max
        } else {
            cfg.step_base
        };

        self.batch_delay = if avg_ms > target * BACKOFF_FACTOR {
            self.batch_delay.mul_f64(1.5).min(cfg.batch_delay_max)
        } else {
            self.batch_delay.mul_f64(0.9).max(cfg.batch_delay_min)
        };

        self.clamp_to(cfg);
        Retune {
            avg_ms,
            concurrency: self.concurrency,
            changed: self.concurrency != before,
        }
    }

    /// Clamps every knob into the bounds of `cfg`.
    pub fn clamp_to(&mut self, cfg: &Config) {
        self.concurrency = self
            .concurrency
            .clamp(cfg.concurrency_min, cfg.concurrency_max);
        self.step = self.step.clamp(cfg.step_base, cfg.step_max);
        self.batch_delay = self
            .batch_delay
            .clamp(cfg.batch_delay_min, cfg.batch_delay_max);
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn batch_delay(&self) -> Duration {
        self.batch_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> Config {
        Config {
            concurrency_min: 1,
            concurrency_max: 4,
            concurrency_init: 2,
            ..Config::default()
        }
    }

    #[test]
    fn fresh_success_rate_is_half() {
        let b = Balancer::new(&cfg());
        assert!((b.success_rate() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn fast_activations_grow_to_max() {
        let cfg = cfg();
        let mut b = Balancer::new(&cfg);
        let mut seen = vec![b.concurrency()];
        for _ in 0..20 {
            b.retune(3.0, &cfg);
            seen.push(b.concurrency());
        }
        assert_eq!(&seen[..4], &[2, 3, 4, 4]);
        assert!(seen.iter().all(|&c| (1..=4).contains(&c)));
    }

    #[test]
    fn dead_band_holds_concurrency() {
        let cfg = cfg();
        let mut b = Balancer::new(&cfg);
        for avg in [12.0, 15.0, 21.5, 18.0] {
            for _ in 0..50 {
                let r = b.retune(avg, &cfg);
                assert!(!r.changed);
            }
            assert_eq!(b.concurrency(), 2);
        }
    }

    #[test]
    fn slow_activations_shrink_to_min() {
        let cfg = cfg();
        let mut b = Balancer::new(&cfg);
        b.retune(30.0, &cfg);
        assert_eq!(b.concurrency(), 1);
        b.retune(30.0, &cfg);
        assert_eq!(b.concurrency(), 1);
    }

    #[test]
    fn delay_backs_off_and_relaxes_within_bounds() {
        let cfg = cfg();
        let mut b = Balancer::new(&cfg);
        for _ in 0..30 {
            b.retune(100.0, &cfg);
        }
        assert_eq!(b.batch_delay(), cfg.batch_delay_max);
        for _ in 0..500 {
            b.retune(1.0, &cfg);
        }
        assert!(b.batch_delay() >= cfg.batch_delay_min);
        assert!(b.batch_delay() < Duration::from_millis(1));
    }

    #[test]
    fn step_follows_success_rate() {
        let cfg = cfg();
        let mut b = Balancer::new(&cfg);
        b.retune(15.0, &cfg);
        assert_eq!(b.step(), cfg.step_base);

        for _ in 0..3 {
            b.record_instant(true);
        }
        // (3 + 1) / (3 + 2) = 0.8
        b.retune(15.0, &cfg);
        assert_eq!(b.step(), cfg.step_max);

        for _ in 0..5 {
            b.record_instant(false);
        }
        b.retune(15.0, &cfg);
        assert_eq!(b.step(), cfg.step_base);
    }

    #[test]
    fn clamp_follows_new_bounds() {
        let mut cfg = cfg();
        let mut b = Balancer::new(&cfg);
        for _ in 0..5 {
            b.retune(0.0, &cfg);
        }
        assert_eq!(b.concurrency(), 4);
        cfg.concurrency_max = 2;
        cfg.concurrency_init = 2;
        b.clamp_to(&cfg);
        assert_eq!(b.concurrency(), 2);
    }
}
