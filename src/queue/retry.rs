// src/queue/retry.rs

//! Backoff for transient receive failures.

use std::time::Duration;

use tracing::{error, warn};

use crate::errors::Result;
use crate::queue::{MessageLease, QueueClient, ReceiveOptions};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

/// How often, and how patiently, a failed receive is retried.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total receive attempts (including the first) before giving up.
    pub max_attempts: u32,
    /// Delay after the first failure.
    pub base_delay: Duration,
    /// Growth factor applied per further failure.
    pub multiplier: f64,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            multiplier: DEFAULT_MULTIPLIER,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Policy that never waits between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            multiplier: 1.0,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before the next attempt, given how many attempts already failed
    /// (1-indexed): `base_delay * multiplier^(failures - 1)`, capped at
    /// `max_delay`. A negative product (from a hand-built policy) means no wait.
    pub fn next_delay(&self, failures: u32) -> Duration {
        let exponent = failures.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.base_delay.as_secs_f64() * self.multiplier.powi(exponent);
        if !secs.is_finite() || secs >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }
        Duration::from_secs_f64(secs.max(0.0))
    }
}

/// Receive with retries.
///
/// Only transient queue errors are retried; a permanent one (missing queue,
/// denied access) is returned straight away. Once `max_attempts` is exhausted
/// the last error is returned and the caller is expected to abort.
pub async fn receive_with_retry<Q>(
    queue: &mut Q,
    options: ReceiveOptions,
    policy: &RetryPolicy,
) -> Result<Option<MessageLease>>
where
    Q: QueueClient + ?Sized,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match queue.receive(options).await {
            Ok(lease) => return Ok(lease),
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                let delay = policy.next_delay(attempt);
                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "receive failed; backing off"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => {
                error!(attempt, error = %err, "receive failed; giving up");
                return Err(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_backs_off_exponentially() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.next_delay(1), Duration::from_secs(1));
        assert_eq!(policy.next_delay(2), Duration::from_secs(2));
        assert_eq!(policy.next_delay(3), Duration::from_secs(4));
        assert_eq!(policy.next_delay(4), Duration::from_secs(8));
    }

    #[test]
    fn delay_is_capped() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.next_delay(6), Duration::from_secs(30));
        assert_eq!(policy.next_delay(u32::MAX), Duration::from_secs(30));
    }

    #[test]
    fn negative_multiplier_does_not_panic() {
        let policy = RetryPolicy {
            multiplier: -2.0,
            ..RetryPolicy::default()
        };

        assert_eq!(policy.next_delay(1), Duration::from_secs(1));
        assert_eq!(policy.next_delay(2), Duration::ZERO);
        assert_eq!(policy.next_delay(3), Duration::from_secs(4));
    }

    #[test]
    fn immediate_policy_never_sleeps() {
        let policy = RetryPolicy::immediate(3);
        assert_eq!(policy.next_delay(1), Duration::ZERO);
        assert_eq!(policy.next_delay(3), Duration::ZERO);
    }
}
