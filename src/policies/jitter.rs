//! # Jitter policy for discovery poll periods.
//!
//! [`JitterPolicy`] adds randomness to the discovery poll period so that several
//! schedulers attached to sibling documents do not scan in lockstep.
//!
//! - [`JitterPolicy::None`]: no randomization, predictable periods
//! - [`JitterPolicy::Full`]: random period in [0, period]
//! - [`JitterPolicy::Equal`]: period/2 + random[0, period/2]

use rand::Rng;
use std::time::Duration;

/// Policy controlling randomization of periodic delays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum JitterPolicy {
    /// No jitter: use the exact period (default).
    #[default]
    None,

    /// Full jitter: random period in [0, period].
    ///
    /// Can significantly shorten the period; scans may come in bursts.
    Full,

    /// Equal jitter: period/2 + random[0, period/2].
    ///
    /// Preserves ~75% of the period on average.
    Equal,
}

impl JitterPolicy {
    /// Applies jitter to the given period.
    pub fn apply(&self, period: Duration) -> Duration {
        match self {
            JitterPolicy::None => period,
            JitterPolicy::Full => full_jitter(period),
            JitterPolicy::Equal => equal_jitter(period),
        }
    }
}

/// Full jitter: random[0, period]
fn full_jitter(period: Duration) -> Duration {
    let ms = period.as_millis() as u64;
    if ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..=ms))
}

/// Equal jitter: period/2 + random[0, period/2]
fn equal_jitter(period: Duration) -> Duration {
    let ms = period.as_millis() as u64;
    if ms == 0 {
        return Duration::ZERO;
    }
    let half = ms / 2;
    let jitter = if half == 0 {
        0
    } else {
        rand::rng().random_range(0..=half)
    };
    Duration::from_millis(half + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_keeps_period() {
        let p = Duration::from_millis(1500);
        assert_eq!(JitterPolicy::None.apply(p), p);
    }

    #[test]
    fn full_jitter_bounds() {
        let p = Duration::from_millis(1000);
        for _ in 0..50 {
            assert!(JitterPolicy::Full.apply(p) <= p);
        }
    }

    #[test]
    fn equal_jitter_bounds() {
        let p = Duration::from_millis(1000);
        for _ in 0..50 {
            let d = JitterPolicy::Equal.apply(p);
            assert!(d >= Duration::from_millis(500));
            assert!(d <= p);
        }
    }

    #[test]
    fn zero_period_stays_zero() {
        assert_eq!(JitterPolicy::Full.apply(Duration::ZERO), Duration::ZERO);
        assert_eq!(JitterPolicy::Equal.apply(Duration::ZERO), Duration::ZERO);
    }
}
