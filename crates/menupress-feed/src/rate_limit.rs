//! Exponential backoff retry for transient feed-API failures.
//!
//! Only rate limiting (429) and network-level errors are retried; auth
//! failures, missing feeds, and parse errors return the same answer every
//! time and are propagated immediately.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::FeedError;

fn is_retriable(err: &FeedError) -> bool {
    matches!(err, FeedError::RateLimited { .. } | FeedError::Http(_))
}

/// Runs `operation`, sleeping `backoff_base_secs * 2^attempt` seconds between
/// retries of transient errors, up to `max_retries` additional attempts.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, FeedError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FeedError>>,
{
    let mut attempt: u32 = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if is_retriable(&err) && attempt < max_retries => {
                // Cap the shift so extreme retry configs saturate instead of
                // overflowing.
                let sleep_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
                debug!(attempt, sleep_secs, error = %err, "retrying feed request");
                tokio::time::sleep(Duration::from_secs(sleep_secs)).await;
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

    #[tokio::test]
    async fn returns_first_success() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, FeedError> = retry_with_backoff(3, 0, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(7) }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_rate_limits_until_exhausted() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, FeedError> = retry_with_backoff(2, 0, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(FeedError::RateLimited {
                    url: "http://example.test".to_string(),
                })
            }
        })
        .await;
        assert!(matches!(result, Err(FeedError::RateLimited { .. })));
        // Initial attempt plus two retries.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn extreme_retry_counts_do_not_overflow_the_backoff() {
        // More than 64 retries would shift past the u64 width without the cap.
        let calls = AtomicU32::new(0);
        let result: Result<u32, FeedError> = retry_with_backoff(70, 0, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(FeedError::RateLimited {
                    url: "http://example.test".to_string(),
                })
            }
        })
        .await;
        assert!(matches!(result, Err(FeedError::RateLimited { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 71);
    }

    #[tokio::test]
    async fn does_not_retry_not_found() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, FeedError> = retry_with_backoff(3, 0, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(FeedError::NotFound {
                    url: "http://example.test".to_string(),
                })
            }
        })
        .await;
        assert!(matches!(result, Err(FeedError::NotFound { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
