//! Delay policy between status polls.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default delay between polls of a pending job.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// How long to wait before re-polling a job that is still pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum BackoffPolicy {
    /// Always wait the same amount of time.
    Fixed {
        /// Delay between polls.
        interval: Duration,
    },
    /// Grow the delay geometrically, capped at `max`.
    Exponential {
        /// Delay before the first re-poll.
        initial: Duration,
        /// Upper bound on any single delay.
        max: Duration,
        /// Growth factor per attempt.
        multiplier: f64,
        /// Draw the actual delay uniformly from `[0, delay]`.
        jitter: bool,
    },
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::Fixed {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl BackoffPolicy {
    /// A fixed-interval policy.
    #[must_use]
    pub const fn fixed(interval: Duration) -> Self {
        Self::Fixed { interval }
    }

    /// Upper bound of the delay for the given attempt (1-based), before jitter.
    #[must_use]
    pub fn base_delay(&self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { interval } => *interval,
            Self::Exponential {
                initial,
                max,
                multiplier,
                ..
            } => {
                let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
                let factor = multiplier.powi(exponent);
                let millis = initial.as_millis() as f64 * factor;
                if !millis.is_finite() || millis >= max.as_millis() as f64 {
                    return *max;
                }
                Duration::from_millis(millis as u64).min(*max)
            }
        }
    }

    /// Delay to sleep before the given attempt (1-based).
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.base_delay(attempt);
        match self {
            Self::Exponential { jitter: true, .. } if !base.is_zero() => {
                let millis = rand::thread_rng().gen_range(0..=base.as_millis() as u64);
                Duration::from_millis(millis)
            }
            _ => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exponential(jitter: bool) -> BackoffPolicy {
        BackoffPolicy::Exponential {
            initial: Duration::from_secs(1),
            max: Duration::from_secs(30),
            multiplier: 2.0,
            jitter,
        }
    }

    #[test]
    fn default_is_fixed_five_seconds() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(5));
        assert_eq!(policy.delay_for_attempt(50), Duration::from_secs(5));
    }

    #[test]
    fn exponential_grows_and_caps() {
        let policy = exponential(false);
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for_attempt(5), Duration::from_secs(16));
        assert_eq!(policy.delay_for_attempt(6), Duration::from_secs(30)); // capped
        assert_eq!(policy.delay_for_attempt(u32::MAX), Duration::from_secs(30));
    }

    #[test]
    fn exponent_past_i32_range_stays_capped() {
        let policy = exponential(false);
        for attempt in [1 << 31, (1 << 31) + 1, u32::MAX - 1, u32::MAX] {
            assert_eq!(policy.base_delay(attempt), Duration::from_secs(30));
        }
    }

    #[test]
    fn jitter_stays_within_base() {
        let policy = exponential(true);
        for attempt in 1..10 {
            let delay = policy.delay_for_attempt(attempt);
            assert!(delay <= policy.base_delay(attempt));
        }
    }

    #[test]
    fn policy_deserializes_from_tagged_json() {
        let json = r#"{"strategy":"fixed","interval":{"secs":2,"nanos":0}}"#;
        let policy: BackoffPolicy = serde_json::from_str(json).unwrap_or_default();
        assert_eq!(policy, BackoffPolicy::fixed(Duration::from_secs(2)));
    }
}
