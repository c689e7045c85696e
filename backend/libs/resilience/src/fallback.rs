/// Degrade-instead-of-fail wrapper for upstream calls
///
/// Runs a fallible future under a deadline. Any error, including the deadline
/// passing, is logged and replaced by a fallback value, so callers always get
/// something to work with.
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::timeout::{with_timeout_result, TimeoutError};

/// Value produced by [`with_fallback`], tagged with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degraded<T> {
    /// The upstream call succeeded
    Fresh(T),
    /// The upstream call failed and the fallback was used
    Fallback(T),
}

impl<T> Degraded<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Degraded::Fallback(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Degraded::Fresh(value) | Degraded::Fallback(value) => value,
        }
    }
}

/// Await `future` for at most `deadline`; on any failure return `fallback()`.
pub async fn with_fallback<Fut, T, E, D>(
    operation: &str,
    deadline: Duration,
    future: Fut,
    fallback: D,
) -> Degraded<T>
where
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    D: FnOnce() -> T,
{
    match with_timeout_result(deadline, future).await {
        Ok(value) => Degraded::Fresh(value),
        Err(TimeoutError::Elapsed(d)) => {
            warn!(operation, deadline = ?d, "Upstream call timed out, using fallback");
            Degraded::Fallback(fallback())
        }
        Err(TimeoutError::Inner(e)) => {
            warn!(operation, error = %e, "Upstream call failed, using fallback");
            Degraded::Fallback(fallback())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fresh_value_passes_through() {
        let result = with_fallback(
            "list_users",
            Duration::from_secs(1),
            async { Ok::<_, String>(vec![1, 2]) },
            Vec::new,
        )
        .await;

        assert_eq!(result, Degraded::Fresh(vec![1, 2]));
    }

    #[tokio::test]
    async fn test_error_degrades_to_fallback() {
        let result = with_fallback(
            "list_users",
            Duration::from_secs(1),
            async { Err::<Vec<i32>, _>("502 Bad Gateway") },
            || vec![7],
        )
        .await;

        assert!(result.is_fallback());
        assert_eq!(result.into_inner(), vec![7]);
    }

    #[tokio::test]
    async fn test_deadline_degrades_to_fallback() {
        let result = with_fallback(
            "list_user_posts",
            Duration::from_millis(10),
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<_, String>(1)
            },
            || 0,
        )
        .await;

        assert_eq!(result, Degraded::Fallback(0));
    }
}
