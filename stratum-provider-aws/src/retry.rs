//! Retrying API calls while the service reports an eventually consistent error

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

/// How long and how often to retry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub interval: Duration,
}

impl RetryPolicy {
    /// S3 bucket creation can take this long to become visible to other APIs
    pub const PROPAGATION_TIMEOUT: Duration = Duration::from_secs(120);
    pub const PROPAGATION_INTERVAL: Duration = Duration::from_secs(5);

    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::PROPAGATION_TIMEOUT, Self::PROPAGATION_INTERVAL)
    }
}

/// Run `op` until it succeeds, fails with an error `should_retry` rejects,
/// or the next attempt would start after the policy's timeout.
/// The last result is returned as-is.
pub async fn retry_while<T, E, F, Fut, P>(
    policy: RetryPolicy,
    should_retry: P,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let deadline = Instant::now() + policy.timeout;
    let mut attempt: u32 = 1;

    loop {
        match op().await {
            Err(err) if should_retry(&err) && Instant::now() + policy.interval <= deadline => {
                log::debug!(
                    "attempt {} hit a retryable error, retrying in {:?}",
                    attempt,
                    policy.interval
                );
                tokio::time::sleep(policy.interval).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick() -> RetryPolicy {
        RetryPolicy::new(Duration::from_secs(5), Duration::from_millis(1))
    }

    #[test]
    fn default_policy_matches_propagation_window() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.timeout, Duration::from_secs(120));
        assert_eq!(policy.interval, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn retries_until_success() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<&str, &str> = retry_while(
            quick(),
            |e| *e == "NoSuchBucket",
            || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err("NoSuchBucket")
                } else {
                    Ok("done")
                }
            },
        )
        .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_error_returns_immediately() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), &str> = retry_while(
            quick(),
            |e| *e == "NoSuchBucket",
            || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("AccessDenied")
            },
        )
        .await;

        assert_eq!(result, Err("AccessDenied"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_timeout() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let policy = RetryPolicy::new(Duration::ZERO, Duration::from_millis(1));
        let result: Result<(), &str> = retry_while(
            policy,
            |_| true,
            || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("NoSuchBucket")
            },
        )
        .await;

        assert_eq!(result, Err("NoSuchBucket"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
