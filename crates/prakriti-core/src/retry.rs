//! Bounded retry with exponential backoff for quota failures.
//!
//! Only failures carrying the quota signature are retried: a 429 status or a
//! resource-exhaustion marker anywhere in the error chain. Everything else,
//! and the last quota failure once retries run out, is returned unchanged.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Textual markers of a quota failure, compared against the uppercased error.
const QUOTA_MARKERS: [&str; 3] = ["429", "RESOURCE_EXHAUSTED", "QUOTA_EXCEEDED"];

/// How many times to retry and how long to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Wait before the first retry; doubles on each retry.
    pub base_delay: Duration,
    /// Upper bound (exclusive) of the uniform jitter added to every wait.
    pub max_jitter: Duration,
    /// Optional ceiling on the doubling base delay. `None` leaves growth
    /// unbounded; `max_retries` is then the only limit.
    #[serde(default)]
    pub max_delay: Option<Duration>,
}

impl RetryPolicy {
    pub const DEFAULT_JITTER: Duration = Duration::from_millis(2000);

    /// Full budget used for synthesis and translation: 5 retries from 3s.
    pub fn synthesis() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_millis(3000),
            max_jitter: Self::DEFAULT_JITTER,
            max_delay: None,
        }
    }

    /// Reduced budget for the interactive photo check: 2 retries from 2s.
    pub fn validation() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(2000),
            max_jitter: Self::DEFAULT_JITTER,
            max_delay: None,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_max_jitter(mut self, max_jitter: Duration) -> Self {
        self.max_jitter = max_jitter;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Option<Duration>) -> Self {
        self.max_delay = max_delay;
        self
    }

    fn next_delay(&self, delay: Duration) -> Duration {
        let doubled = delay.saturating_mul(2);
        match self.max_delay {
            Some(cap) => doubled.min(cap),
            None => doubled,
        }
    }

    /// Wait before the next attempt: `delay` plus jitter.
    fn backoff(&self, delay: Duration) -> Duration {
        delay.saturating_add(self.jitter())
    }

    fn jitter(&self) -> Duration {
        let max_ms = self.max_jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..max_ms))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::synthesis()
    }
}

/// Whether `err` carries the quota signature.
pub fn is_quota_error(err: &anyhow::Error) -> bool {
    let typed = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<ProviderError>())
        .any(ProviderError::is_rate_limit);
    if typed {
        return true;
    }
    let rendered = format!("{err:#}").to_uppercase();
    QUOTA_MARKERS.iter().any(|marker| rendered.contains(marker))
}

/// Run `call`, retrying quota failures with exponential backoff and jitter.
///
/// The wait before retry `n` (1-based) is `base_delay * 2^(n-1)` plus a
/// uniform jitter in `[0, max_jitter)`. Non-quota failures are returned after
/// the first attempt without waiting.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut call: F) -> anyhow::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut remaining = policy.max_retries;
    let mut delay = policy.base_delay;

    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(err) if remaining > 0 && is_quota_error(&err) => {
                let wait = policy.backoff(delay);
                tracing::warn!(
                    wait_ms = wait.as_millis() as u64,
                    remaining,
                    error = %err,
                    "quota exhausted, backing off before retrying"
                );
                tokio::time::sleep(wait).await;
                remaining -= 1;
                delay = policy.next_delay(delay);
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use anyhow::anyhow;
    use tokio::time::Instant;

    use super::*;

    fn rate_limited(n: u32) -> anyhow::Error {
        ProviderError::RateLimited {
            message: format!("RESOURCE_EXHAUSTED attempt {n}"),
        }
        .into()
    }

    #[test]
    fn backoff_saturates_at_max_duration() {
        let policy = RetryPolicy::synthesis().with_base_delay(Duration::MAX);
        let delay = policy.next_delay(policy.base_delay);
        assert_eq!(delay, Duration::MAX);
        assert_eq!(policy.backoff(delay), Duration::MAX);

        let small = policy.backoff(Duration::from_secs(3));
        assert!(small >= Duration::from_secs(3) && small < Duration::from_secs(5));
    }

    #[test]
    fn quota_signature_matching() {
        assert!(is_quota_error(&rate_limited(1)));
        assert!(is_quota_error(
            &ProviderError::ApiError {
                status: 429,
                message: "busy".into()
            }
            .into()
        ));
        assert!(is_quota_error(&anyhow!("upstream said resource_exhausted")));
        assert!(is_quota_error(&anyhow!("Quota_Exceeded for project")));
        assert!(is_quota_error(
            &anyhow!("status 429").context("synthesis call failed")
        ));
        assert!(!is_quota_error(&anyhow!("connection reset")));
        assert!(!is_quota_error(
            &ProviderError::ApiError {
                status: 500,
                message: "internal".into()
            }
            .into()
        ));
    }

    #[test]
    fn quota_signature_found_through_context() {
        let err = anyhow::Error::from(ProviderError::RateLimited {
            message: "slow down".into(),
        })
        .context("translation request");
        assert!(is_quota_error(&err));
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_three_quota_failures() {
        let attempts = AtomicU32::new(0);
        let started = Instant::now();

        let value = with_retry(&RetryPolicy::synthesis(), || {
            let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n <= 3 {
                    Err(rate_limited(n))
                } else {
                    Ok("synthesized")
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(value, "synthesized");
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
        // Three sleeps: 3s + 6s + 12s, each with < 2s of jitter.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(21_000), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(27_000), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_waits_double_each_time() {
        let stamps = Mutex::new(Vec::new());
        let attempts = AtomicU32::new(0);
        let policy = RetryPolicy::synthesis();

        let _ = with_retry(&policy, || {
            stamps.lock().unwrap().push(Instant::now());
            let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n <= 4 {
                    Err(rate_limited(n))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        let stamps = stamps.into_inner().unwrap();
        assert_eq!(stamps.len(), 5);
        let mut floor = policy.base_delay;
        let mut previous_floor = Duration::ZERO;
        for pair in stamps.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(gap >= floor, "gap {gap:?} below {floor:?}");
            assert!(gap < floor + policy.max_jitter, "gap {gap:?} too long");
            assert!(floor > previous_floor);
            previous_floor = floor;
            floor *= 2;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_return_last_failure() {
        let attempts = AtomicU32::new(0);
        let policy = RetryPolicy::synthesis().with_max_retries(2);

        let err = with_retry(&policy, || {
            let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Err::<(), _>(rate_limited(n)) }
        })
        .await
        .unwrap_err();

        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        let provider_err = err.downcast_ref::<ProviderError>().unwrap();
        assert!(matches!(
            provider_err,
            ProviderError::RateLimited { message } if message == "RESOURCE_EXHAUSTED attempt 3"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn non_quota_failure_is_not_retried() {
        let attempts = AtomicU32::new(0);
        let started = Instant::now();

        let err = with_retry(&RetryPolicy::synthesis(), || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(anyhow::Error::from(ProviderError::Timeout(30))) }
        })
        .await
        .unwrap_err();

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert!(matches!(
            err.downcast_ref::<ProviderError>(),
            Some(ProviderError::Timeout(30))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_retries_means_single_attempt() {
        let attempts = AtomicU32::new(0);
        let policy = RetryPolicy::synthesis().with_max_retries(0);

        let result = with_retry(&policy, || {
            let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Err::<(), _>(rate_limited(n)) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn max_delay_caps_backoff_growth() {
        let policy = RetryPolicy::synthesis()
            .with_max_retries(3)
            .with_max_jitter(Duration::ZERO)
            .with_max_delay(Some(Duration::from_millis(4000)));
        let attempts = AtomicU32::new(0);
        let started = Instant::now();

        let _ = with_retry(&policy, || {
            let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Err::<(), _>(rate_limited(n)) }
        })
        .await;

        // 3s, then 6s capped to 4s, then 4s.
        assert_eq!(started.elapsed(), Duration::from_millis(11_000));
    }

    #[test]
    fn budgets() {
        let s = RetryPolicy::synthesis();
        assert_eq!(s.max_retries, 5);
        assert_eq!(s.base_delay, Duration::from_millis(3000));
        let v = RetryPolicy::validation();
        assert_eq!(v.max_retries, 2);
        assert_eq!(v.base_delay, Duration::from_millis(2000));
        assert_eq!(v.max_jitter, Duration::from_millis(2000));
    }
}
