//! Async testing utilities.
//!
//! Timeout wrappers for tests that wait on teardown running elsewhere, such
//! as releases handed to a background task when a stack is dropped.

use std::future::Future;
use std::time::Duration;

/// Default timeout for async operations in tests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Run a future with a timeout.
///
/// # Panics
///
/// Panics if the future does not complete within the timeout.
pub async fn with_timeout<T, F>(timeout: Duration, future: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(timeout, future)
        .await
        .expect("Test timed out")
}

/// Run a future with [`DEFAULT_TIMEOUT`].
///
/// # Panics
///
/// Panics if the future does not complete within the timeout.
pub async fn with_default_timeout<T, F>(future: F) -> T
where
    F: Future<Output = T>,
{
    with_timeout(DEFAULT_TIMEOUT, future).await
}

/// Assert that a future does not complete within `timeout`.
///
/// # Panics
///
/// Panics if the future completes before the timeout.
pub async fn assert_times_out<T, F>(timeout: Duration, future: F)
where
    F: Future<Output = T>,
{
    let result = tokio::time::timeout(timeout, future).await;
    assert!(
        result.is_err(),
        "Expected operation to time out, but it completed"
    );
}

/// Wait for a condition to become true.
///
/// Polls `condition` every `interval` until it holds or `timeout` elapses.
///
/// # Panics
///
/// Panics if the condition is not met within the timeout.
pub async fn wait_for<F>(timeout: Duration, interval: Duration, mut condition: F)
where
    F: FnMut() -> bool,
{
    let start = tokio::time::Instant::now();
    while !condition() {
        assert!(
            start.elapsed() <= timeout,
            "Condition not met within timeout"
        );
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_with_timeout_completes() {
        let value = with_timeout(Duration::from_secs(1), async { 42 }).await;
        assert_eq!(value, 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_assert_times_out() {
        assert_times_out(
            Duration::from_millis(10),
            tokio::time::sleep(Duration::from_secs(1)),
        )
        .await;
    }

    #[tokio::test]
    async fn test_wait_for_background_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let setter = Arc::clone(&flag);
        tokio::spawn(async move { setter.store(true, Ordering::SeqCst) });

        wait_for(Duration::from_secs(1), Duration::from_millis(5), || {
            flag.load(Ordering::SeqCst)
        })
        .await;
    }
}
