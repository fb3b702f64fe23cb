// ABOUTME: Bounded retry for mutating calls rejected with a resource conflict.
// ABOUTME: Every invocation ends in a result or a terminal error, never silently.

use std::future::Future;
use std::num::NonZeroU32;
use std::time::Duration;

use super::error::DeployError;
use crate::config::RetryConfig;
use crate::remote::RemoteError;

/// Retry budget for one mutating call.
///
/// Only `RemoteError::Conflict` is retried. The wait before retry `n` is
/// `backoff * n`, so each retry waits longer than the one before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: NonZeroU32,
    backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn new(attempts: NonZeroU32, backoff: Duration) -> Self {
        Self { attempts, backoff }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.attempts, config.backoff)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.get()
    }

    /// Wait before the given retry (1 for the first retry).
    pub fn delay(&self, retry: u32) -> Duration {
        self.backoff.saturating_mul(retry)
    }

    /// Run `call` until it succeeds, fails with a non-conflict error, or the
    /// attempt budget is spent.
    pub async fn run<T, F, Fut>(&self, operation: &'static str, mut call: F) -> Result<T, DeployError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RemoteError>>,
    {
        let mut attempt = 1;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(RemoteError::Conflict(message)) if attempt < self.attempts() => {
                    let delay = self.delay(attempt);
                    tracing::warn!(
                        "{} conflicted (attempt {}/{}), retrying in {:?}: {}",
                        operation,
                        attempt,
                        self.attempts(),
                        delay,
                        message
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(RemoteError::Conflict(message)) => {
                    return Err(DeployError::RetriesExhausted {
                        operation,
                        attempts: attempt,
                        message,
                    });
                }
                Err(source) => return Err(DeployError::Remote { operation, source }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::DeployErrorKind;
    use std::cell::Cell;
    use tokio::time::Instant;

    fn policy() -> RetryPolicy {
        RetryPolicy::new(NonZeroU32::new(3).unwrap(), Duration::from_secs(1))
    }

    #[test]
    fn backoff_grows_per_retry() {
        let policy = policy();
        assert!(policy.delay(1) < policy.delay(2));
        assert_eq!(policy.delay(2), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_third_attempt_after_two_waits() {
        let calls = Cell::new(0);
        let start = Instant::now();

        let result = policy()
            .run("update function code", || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n < 3 {
                        Err(RemoteError::Conflict("in progress".into()))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(1 + 2));
    }

    #[tokio::test(start_paused = true)]
    async fn conflict_on_final_attempt_is_terminal() {
        let calls = Cell::new(0);

        let err = policy()
            .run("update function configuration", || {
                calls.set(calls.get() + 1);
                async { Err::<(), _>(RemoteError::Conflict("in progress".into())) }
            })
            .await
            .unwrap_err();

        assert_eq!(calls.get(), 3);
        assert_eq!(err.kind(), DeployErrorKind::Conflict);
    }

    #[tokio::test(start_paused = true)]
    async fn other_errors_are_not_retried() {
        let calls = Cell::new(0);
        let start = Instant::now();

        let err = policy()
            .run("update function code", || {
                calls.set(calls.get() + 1);
                async { Err::<(), _>(RemoteError::Other("access denied".into())) }
            })
            .await
            .unwrap_err();

        assert_eq!(calls.get(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(err.kind(), DeployErrorKind::Remote);
    }

    #[tokio::test]
    async fn single_attempt_budget_never_waits() {
        let policy = RetryPolicy::new(NonZeroU32::MIN, Duration::from_secs(60));

        let err = policy
            .run("update function code", || async {
                Err::<(), _>(RemoteError::Conflict("busy".into()))
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DeployError::RetriesExhausted { attempts: 1, .. }
        ));
    }
}
