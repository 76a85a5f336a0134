use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::config::DEFAULT_MAX_RETRIES;
use crate::error::{OgemError, Result};

/// Whether a failed call is worth repeating
///
/// Rate limits, server-side failures (status 500 and above), timeouts and
/// connection failures are retryable.
pub fn is_retryable(error: &OgemError) -> bool {
    match error {
        OgemError::RateLimit { .. } | OgemError::Timeout(_) | OgemError::Connection(_) => true,
        other => other.status_code().is_some_and(|status| status >= 500),
    }
}

/// Delay before retry number `attempt` (1-based)
///
/// A rate limit with a server-provided `retry_after` is honored verbatim.
/// Otherwise the delay is exponential in `attempt` with up to 10% jitter.
pub fn retry_delay(error: &OgemError, attempt: u32, base: Duration) -> Duration {
    if let OgemError::RateLimit {
        retry_after: Some(retry_after),
        ..
    } = error
        && !retry_after.is_zero()
    {
        return *retry_after;
    }

    let factor = 2_u32.saturating_pow(attempt.saturating_sub(1));
    let delay = base.saturating_mul(factor);
    let jitter = delay.mul_f64(rand::rng().random_range(0.0..=0.1));

    delay.saturating_add(jitter)
}

/// Retries retryable failures with backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub const fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self { max_retries, base_delay }
    }

    /// Run `operation` until it succeeds, fails permanently, or the retry
    /// budget is spent
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) if attempt < self.max_retries && is_retryable(&error) => {
                    attempt += 1;
                    let delay = self.delay(&error, attempt);
                    tokio::time::sleep(delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// Blocking counterpart of [`run`](Self::run)
    #[cfg(feature = "blocking")]
    pub fn run_blocking<T, F>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Result<T>,
    {
        let mut attempt = 0;

        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(error) if attempt < self.max_retries && is_retryable(&error) => {
                    attempt += 1;
                    std::thread::sleep(self.delay(&error, attempt));
                }
                Err(error) => return Err(error),
            }
        }
    }

    fn delay(&self, error: &OgemError, attempt: u32) -> Duration {
        let delay = retry_delay(error, attempt, self.base_delay);

        tracing::warn!(
            attempt,
            max_retries = self.max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %error,
            "retrying request"
        );

        delay
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use serde_json::Map;

    use super::*;

    fn server_error(status: u16) -> OgemError {
        OgemError::Api {
            status: Some(status),
            error_type: None,
            error_code: None,
            message: "boom".to_owned(),
            details: Map::new(),
        }
    }

    fn rate_limited(retry_after: Option<Duration>) -> OgemError {
        OgemError::RateLimit {
            message: "slow down".to_owned(),
            retry_after,
            limit_type: None,
        }
    }

    #[test]
    fn retryable_errors() {
        assert!(is_retryable(&rate_limited(None)));
        assert!(is_retryable(&OgemError::Timeout("t".to_owned())));
        assert!(is_retryable(&OgemError::Connection("c".to_owned())));
        assert!(is_retryable(&server_error(500)));
        assert!(is_retryable(&server_error(503)));
        assert!(is_retryable(&OgemError::Provider {
            status: Some(502),
            message: "down".to_owned(),
            provider: None,
        }));

        assert!(!is_retryable(&server_error(404)));
        assert!(!is_retryable(&OgemError::Authentication {
            message: "no".to_owned()
        }));
        assert!(!is_retryable(&OgemError::invalid("model is required")));
        assert!(!is_retryable(&OgemError::Stream("bad chunk".to_owned())));
        assert!(!is_retryable(&OgemError::Transport("tls".to_owned())));
    }

    #[test]
    fn rate_limit_delay_is_verbatim() {
        let error = rate_limited(Some(Duration::from_secs(30)));
        assert_eq!(retry_delay(&error, 3, Duration::from_secs(1)), Duration::from_secs(30));
    }

    #[test]
    fn backoff_is_exponential_with_bounded_jitter() {
        let base = Duration::from_millis(100);

        for attempt in 1..=5 {
            let expected = base * 2_u32.pow(attempt - 1);

            for _ in 0..50 {
                let delay = retry_delay(&server_error(500), attempt, base);
                assert!(delay >= expected, "attempt {attempt}: {delay:?} < {expected:?}");
                assert!(delay <= expected + expected / 10 + Duration::from_micros(1), "attempt {attempt}: {delay:?} too long");
            }
        }
    }

    #[test]
    fn zero_retry_after_uses_backoff() {
        let delay = retry_delay(&rate_limited(Some(Duration::ZERO)), 1, Duration::from_secs(2));
        assert!(delay >= Duration::from_secs(2));
    }

    #[test]
    fn huge_attempts_saturate() {
        let delay = retry_delay(&server_error(500), 200, Duration::from_secs(1));
        assert!(delay >= Duration::from_secs(u64::from(u32::MAX)));
    }

    #[tokio::test]
    async fn run_retries_until_success() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(1));

        let result = policy
            .run(|| async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(server_error(503))
                } else {
                    Ok("done")
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn run_gives_up_after_budget() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(2, Duration::from_millis(1));

        let result: Result<()> = policy
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(OgemError::Timeout("slow".to_owned()))
            })
            .await;

        assert!(matches!(result, Err(OgemError::Timeout(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn run_does_not_retry_permanent_errors() {
        let calls = AtomicU32::new(0);

        let result: Result<()> = RetryPolicy::default()
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(OgemError::invalid("messages is required"))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[cfg(feature = "blocking")]
    #[test]
    fn blocking_run_retries() {
        let mut calls = 0;
        let policy = RetryPolicy::new(1, Duration::from_millis(1));

        let result = policy.run_blocking(|| {
            calls += 1;
            if calls == 1 { Err(OgemError::Connection("refused".to_owned())) } else { Ok(calls) }
        });

        assert_eq!(result.unwrap(), 2);
    }
}
