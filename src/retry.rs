//! Exponential backoff with jitter for transient API failures.
//!
//! The default policy is a single attempt, i.e. no retries — callers opt in
//! explicitly rather than inheriting a hidden retry loop.

use std::future::Future;
use std::time::Duration;

use rand::Rng as _;

/// Retry configuration for export calls. Jitter prevents a thundering herd
/// when many concurrent exports hit the same transient failure.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Must be at least 1.
    pub max_attempts: u32,
    pub base_delay_secs: u64,
    pub max_delay_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            base_delay_secs: 5,
            max_delay_secs: 60,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (0-indexed):
    /// `min(base * 2^retry, max) + jitter(0..base)`.
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exp_delay = self
            .base_delay_secs
            .saturating_mul(1u64.checked_shl(retry).unwrap_or(u64::MAX));
        let capped = exp_delay.min(self.max_delay_secs);
        let jitter = if self.base_delay_secs > 0 {
            rand::thread_rng().gen_range(0..self.base_delay_secs)
        } else {
            0
        };
        Duration::from_secs(capped + jitter)
    }
}

/// Run `operation`, retrying per `policy` while `retryable` classifies the
/// error as transient. Returns the first `Ok`, or the last error once
/// attempts are exhausted or a non-retryable error appears.
pub async fn with_backoff<F, Fut, T, E, C>(
    policy: &RetryPolicy,
    retryable: C,
    operation: F,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let attempts = policy.max_attempts.max(1);

    for attempt in 0..attempts {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(e) => {
                if !retryable(&e) || attempt + 1 >= attempts {
                    return Err(e);
                }
                let delay = policy.delay_for_retry(attempt);
                tracing::warn!(
                    "Retryable error (attempt {}/{}), retrying in {}s: {}",
                    attempt + 1,
                    attempts,
                    delay.as_secs(),
                    e
                );
                tokio::time::sleep(delay).await;
            }
        }
    }

    unreachable!("attempt loop always returns")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    const NO_DELAY: RetryPolicy = RetryPolicy {
        max_attempts: 3,
        base_delay_secs: 0,
        max_delay_secs: 0,
    };

    #[test]
    fn test_default_policy_is_single_attempt() {
        assert_eq!(RetryPolicy::default().max_attempts, 1);
    }

    #[test]
    fn test_delay_exponential_backoff() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay_secs: 2,
            max_delay_secs: 60,
        };
        // retry 0: 2 + jitter(0..2), retry 1: 4 + jitter, retry 2: 8 + jitter
        let d = policy.delay_for_retry(0);
        assert!(d.as_secs() >= 2 && d.as_secs() < 4);
        let d = policy.delay_for_retry(1);
        assert!(d.as_secs() >= 4 && d.as_secs() < 6);
        let d = policy.delay_for_retry(2);
        assert!(d.as_secs() >= 8 && d.as_secs() < 10);
    }

    #[test]
    fn test_delay_capped_at_max() {
        let policy = RetryPolicy {
            max_attempts: 11,
            base_delay_secs: 5,
            max_delay_secs: 30,
        };
        let d = policy.delay_for_retry(10);
        assert!(d.as_secs() >= 30 && d.as_secs() < 35);
    }

    #[tokio::test]
    async fn test_succeeds_first_try() {
        let result: Result<i32, String> =
            with_backoff(&NO_DELAY, |_| true, || async { Ok(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_non_retryable_aborts_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let result: Result<i32, String> = with_backoff(&NO_DELAY, |_| false, || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err("fatal".to_string())
            }
        })
        .await;
        assert_eq!(result.unwrap_err(), "fatal");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let result: Result<i32, String> = with_backoff(&NO_DELAY, |_| true, || {
            let c = c.clone();
            async move {
                if c.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err("transient".to_string())
                } else {
                    Ok(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_attempts_exhausted() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let result: Result<i32, String> = with_backoff(&NO_DELAY, |_| true, || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err("still failing".to_string())
            }
        })
        .await;
        assert_eq!(result.unwrap_err(), "still failing");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
