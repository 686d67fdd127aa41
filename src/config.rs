//! # Scheduler configuration.
//!
//! Provides [`Config`], the centralized tunables of a [`Scheduler`](crate::Scheduler).
//!
//! Config is used in two ways:
//! 1. **Scheduler creation**: `Scheduler::builder(config)`
//! 2. **Live retuning**: `scheduler.update_config(|cfg| ...)`; the controller
//!    state is re-clamped to the new bounds on every update.
//!
//! ## Units
//! - time-based knobs are [`Duration`]s;
//! - media positions and steps are seconds (`f64`), like the host's media API.

use std::time::Duration;

use crate::error::ConfigError;
use crate::policies::{CleanupPolicy, JitterPolicy};

/// Tunables of the scheduler.
///
/// ## Field groups
/// - **Concurrency**: `concurrency_min/max/init` bound the number of in-flight items
/// - **Pacing**: `batch_delay_min/max/init` bound the advisory poll pacing
/// - **Strategy**: `prefer_instant_ready_state`, `step_base/max`, `incremental_max_steps`
/// - **Controller**: `adapt_window`, `adapt_target_work`
/// - **Cleanup**: `cleanup_after_finish`, `cleanup_only_transient_source`
/// - **Discovery**: `poll_interval`, `poll_jitter`, `heal_interval`
/// - **Output**: `notify_on_done`, `quiet`, `bus_capacity`
#[derive(Clone, Debug)]
pub struct Config {
    /// Lower bound of the concurrency limit (at least 1).
    pub concurrency_min: usize,
    /// Upper bound of the concurrency limit.
    pub concurrency_max: usize,
    /// Concurrency limit at start.
    pub concurrency_init: usize,

    /// Lower bound of the batch delay.
    pub batch_delay_min: Duration,
    /// Upper bound of the batch delay.
    pub batch_delay_max: Duration,
    /// Batch delay at start.
    ///
    /// The batch delay is advisory: it is added to the discovery poll period and
    /// never delays drainer activations.
    pub batch_delay_init: Duration,

    /// Minimum readiness ordinal for an item to be considered for the instant strategy.
    pub prefer_instant_ready_state: u8,

    /// Incremental step (seconds) while the instant strategy is unreliable.
    pub step_base: f64,
    /// Incremental step (seconds) while the instant strategy succeeds often.
    pub step_max: f64,
    /// Upper bound on incremental iterations per item.
    ///
    /// Items with unknown duration have no natural end; after this many steps
    /// they are finished anyway.
    pub incremental_max_steps: u32,

    /// Width of the latency sampling window.
    pub adapt_window: Duration,
    /// Target activation latency; the controller steers around it.
    pub adapt_target_work: Duration,

    /// Release item resources after finishing.
    pub cleanup_after_finish: bool,
    /// Restrict release to transient sources (object URLs, live streams).
    pub cleanup_only_transient_source: bool,

    /// Base period of the discovery poll (the batch delay is added on top).
    pub poll_interval: Duration,
    /// Jitter applied to every poll period.
    pub poll_jitter: JitterPolicy,
    /// Period of the mutation-observer health check.
    pub heal_interval: Duration,

    /// Call the notifier once per finished item.
    pub notify_on_done: bool,
    /// Mute the built-in log subscriber (honoured by `update_config`).
    pub quiet: bool,
    /// Capacity of the event bus ring buffer (min 1; clamped by Bus).
    pub bus_capacity: usize,
}

impl Config {
    /// Returns the cleanup policy derived from the two cleanup flags.
    #[inline]
    pub fn cleanup_policy(&self) -> CleanupPolicy {
        CleanupPolicy::from_flags(
            self.cleanup_after_finish,
            self.cleanup_only_transient_source,
        )
    }

    /// Returns the controller target in (fractional) milliseconds.
    #[inline]
    pub fn target_work_ms(&self) -> f64 {
        self.adapt_target_work.as_secs_f64() * 1000.0
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Checks bounds and value domains.
    ///
    /// # Example
    /// ```
    /// use drainvisor::Config;
    ///
    /// let mut cfg = Config::default();
    /// assert!(cfg.validate().is_ok());
    ///
    /// cfg.concurrency_min = 10;
    /// cfg.concurrency_max = 4;
    /// assert!(cfg.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency_min == 0 {
            return Err(ConfigError::InvalidValue {
                field: "concurrency_min",
                reason: "must be at least 1",
            });
        }
        if self.concurrency_min > self.concurrency_max
            || !(self.concurrency_min..=self.concurrency_max).contains(&self.concurrency_init)
        {
            return Err(ConfigError::InvalidBounds {
                field: "concurrency",
            });
        }
        if self.batch_delay_min > self.batch_delay_max
            || !(self.batch_delay_min..=self.batch_delay_max).contains(&self.batch_delay_init)
        {
            return Err(ConfigError::InvalidBounds {
                field: "batch_delay",
            });
        }
        if !self.step_base.is_finite() || self.step_base <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "step_base",
                reason: "must be finite and positive",
            });
        }
        if !self.step_max.is_finite() || self.step_max < self.step_base {
            return Err(ConfigError::InvalidBounds { field: "step" });
        }
        if self.incremental_max_steps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "incremental_max_steps",
                reason: "must be at least 1",
            });
        }
        if self.adapt_window.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "adapt_window",
                reason: "must be non-zero",
            });
        }
        if self.adapt_target_work.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "adapt_target_work",
                reason: "must be non-zero",
            });
        }
        if self.poll_interval.is_zero() || self.heal_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval/heal_interval",
                reason: "must be non-zero",
            });
        }
        Ok(())
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - concurrency `1..=8`, starting at `2`
    /// - batch delay `0ms..=1000ms`, starting at `50ms`
    /// - instant strategy from readiness `3` (`HAVE_FUTURE_DATA`)
    /// - steps `30s` / `120s`, at most `10_000` incremental iterations
    /// - window `2s`, target `12ms`
    /// - release transient sources only, notify on done, not quiet
    /// - poll every `1.5s`, heal every `3s`, no jitter
    fn default() -> Self {
        Self {
            concurrency_min: 1,
            concurrency_max: 8,
            concurrency_init: 2,
            batch_delay_min: Duration::ZERO,
            batch_delay_max: Duration::from_millis(1000),
            batch_delay_init: Duration::from_millis(50),
            prefer_instant_ready_state: 3,
            step_base: 30.0,
            step_max: 120.0,
            incremental_max_steps: 10_000,
            adapt_window: Duration::from_millis(2000),
            adapt_target_work: Duration::from_millis(12),
            cleanup_after_finish: true,
            cleanup_only_transient_source: true,
            poll_interval: Duration::from_millis(1500),
            poll_jitter: JitterPolicy::None,
            heal_interval: Duration::from_millis(3000),
            notify_on_done: true,
            quiet: false,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_init_outside_bounds() {
        let cfg = Config {
            concurrency_init: 20,
            ..Config::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidBounds {
                field: "concurrency"
            })
        );

        let cfg = Config {
            batch_delay_init: Duration::from_secs(5),
            ..Config::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidBounds {
                field: "batch_delay"
            })
        );
    }

    #[test]
    fn rejects_zero_concurrency_floor() {
        let cfg = Config {
            concurrency_min: 0,
            concurrency_init: 0,
            ..Config::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue {
                field: "concurrency_min",
                ..
            })
        ));
    }

    #[test]
    fn rejects_bad_steps() {
        let cfg = Config {
            step_base: f64::NAN,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = Config {
            step_base: 50.0,
            step_max: 10.0,
            ..Config::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidBounds { field: "step" }));
    }

    #[test]
    fn cleanup_policy_follows_flags() {
        let cfg = Config {
            cleanup_only_transient_source: false,
            ..Config::default()
        };
        assert_eq!(cfg.cleanup_policy(), CleanupPolicy::Always);
    }

    #[test]
    fn target_in_millis() {
        assert!((Config::default().target_work_ms() - 12.0).abs() < 1e-9);
    }
}
