/// Deadline wrapper for upstream calls
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

/// Default deadline for calls to the remote social API
pub const DEFAULT_UPSTREAM_DEADLINE: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum TimeoutError<E> {
    #[error("Deadline of {0:?} exceeded")]
    Elapsed(Duration),
    #[error("{0}")]
    Inner(E),
}

/// Run a fallible future under a deadline, keeping the inner error typed
pub async fn with_timeout_result<F, T, E>(
    duration: Duration,
    future: F,
) -> Result<T, TimeoutError<E>>
where
    F: Future<Output = Result<T, E>>,
{
    match timeout(duration, future).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(TimeoutError::Inner(e)),
        Err(_) => Err(TimeoutError::Elapsed(duration)),
    }
}
