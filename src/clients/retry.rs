//! Retry policy for the request executor.
//!
//! The policy is pure: given the outcome of an attempt and how many attempts
//! have already been made, it decides whether to retry and how long to wait.
//! Sleeping is left to the executor.
//!
//! - **429**: retried only when `Retry-After` is present, waiting
//!   `min(retry_after, max_retry_after)`
//! - **5xx** and network failures: exponential backoff
//!   `min(base * 2^attempt, max_delay)` plus up to 25% random jitter
//! - **Other 4xx**: never retried

use std::time::Duration;

use rand::Rng;

use crate::config::ClientConfig;

/// Largest exponent applied to the base delay, to avoid overflow.
const MAX_BACKOFF_EXPONENT: u32 = 16;

/// Upper bound of the random jitter, as a fraction of the delay.
const JITTER_FRACTION: f64 = 0.25;

/// What the executor should do after an attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep for `delay`, then issue another attempt.
    Retry {
        /// How long to wait before the next attempt.
        delay: Duration,
    },
    /// The current outcome is terminal.
    Stop,
}

/// Retry budget and delay parameters for one logical call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
    max_retry_after: Duration,
}

impl RetryPolicy {
    /// Creates a policy from explicit parameters.
    #[must_use]
    pub const fn new(
        max_retries: u32,
        base_delay: Duration,
        max_delay: Duration,
        max_retry_after: Duration,
    ) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay,
            max_retry_after,
        }
    }

    /// Creates a policy from client configuration and an optional
    /// per-request retry budget.
    #[must_use]
    pub fn from_config(config: &ClientConfig, max_retries: Option<u32>) -> Self {
        Self::new(
            max_retries.unwrap_or_else(|| config.max_network_retries()),
            config.retry_base_delay(),
            config.max_retry_delay(),
            config.max_retry_after(),
        )
    }

    /// Returns the number of retries allowed after the first attempt.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the total number of attempts this policy allows.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Returns `true` if another attempt may follow attempt number `attempt`
    /// (zero-based).
    #[must_use]
    pub const fn has_budget(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    /// Decides what to do after attempt `attempt` returned `status`.
    #[must_use]
    pub fn decide_status(&self, attempt: u32, status: u16, retry_after: Option<u64>) -> RetryDecision {
        if !self.has_budget(attempt) {
            return RetryDecision::Stop;
        }
        match status {
            429 => retry_after.map_or(RetryDecision::Stop, |seconds| RetryDecision::Retry {
                delay: self.retry_after_delay(seconds),
            }),
            500..=599 => RetryDecision::Retry {
                delay: self.backoff_delay(attempt),
            },
            _ => RetryDecision::Stop,
        }
    }

    /// Decides what to do after attempt `attempt` failed without a response.
    #[must_use]
    pub fn decide_network(&self, attempt: u32) -> RetryDecision {
        if self.has_budget(attempt) {
            RetryDecision::Retry {
                delay: self.backoff_delay(attempt),
            }
        } else {
            RetryDecision::Stop
        }
    }

    /// Exponential backoff for `attempt` without jitter, capped at the
    /// maximum delay.
    #[must_use]
    pub fn base_backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(MAX_BACKOFF_EXPONENT);
        let multiplier = 2_u32.saturating_pow(exponent);
        self.base_delay
            .saturating_mul(multiplier)
            .min(self.max_delay)
    }

    /// Exponential backoff for `attempt` plus up to 25% random jitter.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let delay = self.base_backoff(attempt);
        let jitter_ceiling = delay.mul_f64(JITTER_FRACTION);
        if jitter_ceiling.is_zero() {
            return delay;
        }
        let jitter_ms = rand::thread_rng().gen_range(0..=duration_millis(jitter_ceiling));
        delay + Duration::from_millis(jitter_ms)
    }

    /// Wait requested by a `Retry-After` header, capped at the configured maximum.
    #[must_use]
    pub fn retry_after_delay(&self, seconds: u64) -> Duration {
        Duration::from_secs(seconds).min(self.max_retry_after)
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(
            max_retries,
            Duration::from_millis(500),
            Duration::from_secs(8),
            Duration::from_secs(60),
        )
    }

    #[test]
    fn test_max_attempts_is_one_plus_retries() {
        assert_eq!(policy(0).max_attempts(), 1);
        assert_eq!(policy(2).max_attempts(), 3);
    }

    #[test]
    fn test_base_backoff_doubles_and_caps() {
        let p = policy(10);
        assert_eq!(p.base_backoff(0), Duration::from_millis(500));
        assert_eq!(p.base_backoff(1), Duration::from_millis(1000));
        assert_eq!(p.base_backoff(2), Duration::from_millis(2000));
        assert_eq!(p.base_backoff(4), Duration::from_secs(8));
        assert_eq!(p.base_backoff(30), Duration::from_secs(8));
    }

    #[test]
    fn test_backoff_jitter_is_at_most_a_quarter() {
        let p = policy(10);
        for attempt in 0..6 {
            let base = p.base_backoff(attempt);
            let delay = p.backoff_delay(attempt);
            assert!(delay >= base);
            assert!(delay <= base + base.mul_f64(0.25) + Duration::from_millis(1));
        }
    }

    #[test]
    fn test_zero_base_delay_never_sleeps() {
        let p = RetryPolicy::new(3, Duration::ZERO, Duration::from_secs(1), Duration::from_secs(1));
        assert_eq!(p.backoff_delay(2), Duration::ZERO);
    }

    #[test]
    fn test_retry_after_is_honoured_and_capped() {
        let p = policy(2);
        assert_eq!(p.retry_after_delay(2), Duration::from_millis(2000));
        assert_eq!(p.retry_after_delay(600), Duration::from_secs(60));
        assert_eq!(
            p.decide_status(0, 429, Some(2)),
            RetryDecision::Retry {
                delay: Duration::from_secs(2)
            }
        );
    }

    #[test]
    fn test_429_without_retry_after_stops() {
        assert_eq!(policy(2).decide_status(0, 429, None), RetryDecision::Stop);
    }

    #[test]
    fn test_client_errors_never_retry() {
        let p = policy(5);
        for status in [400, 401, 403, 404, 409, 422] {
            assert_eq!(p.decide_status(0, status, Some(1)), RetryDecision::Stop);
        }
    }

    #[test]
    fn test_server_errors_retry_while_budget_remains() {
        let p = policy(2);
        assert!(matches!(p.decide_status(0, 503, None), RetryDecision::Retry { .. }));
        assert!(matches!(p.decide_status(1, 500, None), RetryDecision::Retry { .. }));
        assert_eq!(p.decide_status(2, 503, None), RetryDecision::Stop);
    }

    #[test]
    fn test_success_is_terminal() {
        assert_eq!(policy(2).decide_status(0, 200, None), RetryDecision::Stop);
    }

    #[test]
    fn test_network_failures_use_budget() {
        let p = policy(1);
        assert!(matches!(p.decide_network(0), RetryDecision::Retry { .. }));
        assert_eq!(p.decide_network(1), RetryDecision::Stop);
        assert_eq!(policy(0).decide_network(0), RetryDecision::Stop);
    }
}
