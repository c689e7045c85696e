/// Resilience helpers for calls to upstream services
///
/// - **Timeout**: every upstream call runs under a deadline
/// - **Retry**: bounded retry budget with optional jittered backoff
/// - **Fallback**: failures degrade to a substitute value instead of surfacing
///
/// # Example: degrade a remote lookup to sample data
///
/// ```rust,no_run
/// use resilience::{with_fallback, DEFAULT_UPSTREAM_DEADLINE};
///
/// #[tokio::main]
/// async fn main() {
///     let names = with_fallback(
///         "list_users",
///         DEFAULT_UPSTREAM_DEADLINE,
///         async { Err::<Vec<String>, _>("connection refused") },
///         || vec!["Alice".to_string()],
///     )
///     .await
///     .into_inner();
///
///     assert_eq!(names, vec!["Alice".to_string()]);
/// }
/// ```

pub mod fallback;
pub mod retry;
pub mod timeout;

pub use fallback::{with_fallback, Degraded};
pub use retry::{with_retry, RetryConfig, RetryError};
pub use timeout::{with_timeout_result, TimeoutError, DEFAULT_UPSTREAM_DEADLINE};
