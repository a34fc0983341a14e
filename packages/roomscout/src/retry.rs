//! Bounded retry with exponential backoff.
//!
//! Generic over the operation and the retryable predicate so the same loop
//! serves any collaborator call that can fail transiently.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Retry budget for a collaborator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,

    /// Delay before the second attempt; doubles per subsequent attempt.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Backoff before the attempt numbered `attempt` (1-based; the first
    /// attempt has no delay).
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            Duration::ZERO
        } else {
            self.base_delay * 2u32.saturating_pow(attempt - 2)
        }
    }
}

/// Run `op` until it succeeds, the error is not retryable, or the attempt
/// budget is exhausted. The closure receives the 1-based attempt number.
pub async fn retry_with_backoff<T, E, F, Fut, P>(
    policy: RetryPolicy,
    is_retryable: P,
    mut op: F,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let max_attempts = policy.max_attempts.max(1);

    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_attempts && is_retryable(&err) => {
                let delay = policy.delay_before(attempt + 1);
                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "retryable failure, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = retry_with_backoff(
            fast_policy(),
            |_| true,
            |attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Err("transient".to_string())
                    } else {
                        Ok(attempt)
                    }
                }
            },
        )
        .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_the_attempt_budget() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> = retry_with_backoff(
            fast_policy(),
            |_| true,
            |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("still down".to_string()) }
            },
        )
        .await;

        assert_eq!(result, Err("still down".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_errors_fail_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> = retry_with_backoff(
            fast_policy(),
            |err: &String| err == "transient",
            |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("terminal".to_string()) }
            },
        )
        .await;

        assert_eq!(result, Err("terminal".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn delay_doubles_per_attempt() {
        let policy = RetryPolicy::new(4, Duration::from_millis(500));
        assert_eq!(policy.delay_before(1), Duration::ZERO);
        assert_eq!(policy.delay_before(2), Duration::from_millis(500));
        assert_eq!(policy.delay_before(3), Duration::from_millis(1000));
        assert_eq!(policy.delay_before(4), Duration::from_millis(2000));
    }
}
