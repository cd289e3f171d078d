use std::{future::Future, time::Duration};

use async_trait::async_trait;
use backoff::{future::retry, Error as BackoffError, ExponentialBackoff};
use tracing::{error, warn};

use crate::NetworkError;

/// Default timeout for retry operations.
pub const DEFAULT_RETRY_TIMEOUT: Duration = Duration::from_secs(60);

/// Trait for implementing retryable RPC operations.
///
/// Only read-only requests may be retried. Submitting a signed transaction must never go through
/// this trait.
#[async_trait]
pub trait RetryableRpc {
    /// Execute an operation with retries using the default timeout.
    async fn with_retry<'a, T, F, Fut>(
        &'a self,
        operation: F,
        operation_name: &str,
    ) -> Result<T, NetworkError>
    where
        F: Fn() -> Fut + Send + Sync + 'a,
        Fut: Future<Output = Result<T, NetworkError>> + Send,
        T: Send;

    /// Execute an operation with retries using a custom timeout.
    async fn with_retry_timeout<'a, T, F, Fut>(
        &'a self,
        operation: F,
        timeout: Duration,
        operation_name: &str,
    ) -> Result<T, NetworkError>
    where
        F: Fn() -> Fut + Send + Sync + 'a,
        Fut: Future<Output = Result<T, NetworkError>> + Send,
        T: Send;
}

/// The backoff policy used by [`retry_operation`].
#[must_use]
pub fn default_backoff(timeout: Option<Duration>) -> ExponentialBackoff {
    ExponentialBackoff {
        initial_interval: Duration::from_secs(1),
        max_interval: Duration::from_secs(30),
        max_elapsed_time: timeout,
        ..Default::default()
    }
}

/// Execute an async operation with exponential backoff retries.
pub async fn retry_operation<T, F, Fut>(
    operation: F,
    timeout: Option<Duration>,
    operation_name: &str,
) -> Result<T, NetworkError>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, NetworkError>> + Send,
{
    retry_with_backoff(default_backoff(timeout), operation, operation_name).await
}

/// Execute an async operation, retrying transient failures according to `backoff`.
///
/// Permanent failures are returned immediately. Once the backoff gives up, the last transient
/// error is returned.
pub async fn retry_with_backoff<T, F, Fut>(
    backoff: ExponentialBackoff,
    operation: F,
    operation_name: &str,
) -> Result<T, NetworkError>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, NetworkError>> + Send,
{
    retry(backoff, || async {
        match operation().await {
            Ok(result) => Ok(result),
            Err(e) if e.is_transient() => {
                warn!("Transient error when {}: {}, retrying...", operation_name, e);
                Err(BackoffError::transient(e))
            }
            Err(e) => {
                error!("Permanent error when {}: {}", operation_name, e);
                Err(BackoffError::permanent(e))
            }
        }
    })
    .await
}
