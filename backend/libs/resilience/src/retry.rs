/// Bounded retry with optional jittered backoff
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before each retry
    pub backoff: Duration,
    /// Spread the delay by ±30%
    pub jitter: bool,
}

impl RetryConfig {
    /// Retry `max_retries` times, waiting about `backoff` before each retry.
    ///
    /// A zero backoff retries immediately; any other delay is jittered.
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
            jitter: !backoff.is_zero(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    #[error("Gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },
}

/// Call `f` until it succeeds or the retry budget runs out.
///
/// The error of the final attempt is returned inside [`RetryError::Exhausted`].
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, mut f: F) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt > config.max_retries => {
                warn!(attempts = attempt, error = %e, "Retry budget exhausted");
                return Err(RetryError::Exhausted { attempts: attempt, last: e });
            }
            Err(e) => {
                let delay = backoff_delay(config.backoff, config.jitter);
                warn!(
                    attempt,
                    max_retries = config.max_retries,
                    error = %e,
                    "Attempt failed, retrying in {:?}",
                    delay
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

fn backoff_delay(base: Duration, jitter: bool) -> Duration {
    if !jitter || base.is_zero() {
        return base;
    }
    let factor = 1.0 + rand::thread_rng().gen_range(-0.3..0.3);
    Duration::from_millis((base.as_millis() as f64 * factor) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_single_retry_recovers() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = with_retry(&RetryConfig::new(1, Duration::ZERO), move || {
            let n = calls_clone.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err("connection reset")
                } else {
                    Ok("users")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "users");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_exhausted_returns_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = with_retry(&RetryConfig::new(1, Duration::ZERO), move || {
            let n = calls_clone.fetch_add(1, Ordering::SeqCst);
            async move { Err::<(), _>(format!("failure #{}", n)) }
        })
        .await;

        match result {
            Err(RetryError::Exhausted { attempts, last }) => {
                assert_eq!(attempts, 2);
                assert_eq!(last, "failure #1");
            }
            Ok(_) => panic!("expected exhaustion"),
        }
    }

    #[test]
    fn test_backoff_enables_jitter() {
        assert!(RetryConfig::new(1, Duration::from_secs(1)).jitter);
        assert!(!RetryConfig::new(1, Duration::ZERO).jitter);
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let base = Duration::from_millis(1000);
        for _ in 0..50 {
            let delay = backoff_delay(base, true);
            assert!(delay >= Duration::from_millis(700));
            assert!(delay <= Duration::from_millis(1300));
        }
        assert_eq!(backoff_delay(base, false), base);
    }
}
