//! Read-through request cache for the user list
//!
//! Mirrors the dashboard's query cache defaults: one entry per query name,
//! 30 second freshness, a single retry when loading fails. Derived rankings are
//! never cached here.

use moka::future::Cache;
use resilience::{with_retry, RetryConfig, RetryError};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::clients::{ClientError, SocialDataSource};
use crate::config::CacheConfig;
use crate::error::{AppError, Result};
use crate::models::UserDirectory;

const USERS_QUERY: &str = "users";

#[derive(Clone)]
pub struct UserDirectoryCache {
    source: Arc<dyn SocialDataSource>,
    entries: Cache<String, Arc<UserDirectory>>,
    retry: RetryConfig,
}

impl UserDirectoryCache {
    pub fn new(source: Arc<dyn SocialDataSource>, config: &CacheConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.users_ttl())
            .build();

        Self {
            source,
            entries,
            retry: RetryConfig::new(config.users_retries, config.users_retry_backoff()),
        }
    }

    pub fn source(&self) -> Arc<dyn SocialDataSource> {
        Arc::clone(&self.source)
    }

    /// Cached user list, loading it when missing or stale.
    ///
    /// Concurrent callers share one load.
    pub async fn users(&self) -> Result<Arc<UserDirectory>> {
        let source = Arc::clone(&self.source);
        let retry = self.retry.clone();

        self.entries
            .try_get_with(USERS_QUERY.to_string(), async move {
                debug!("Loading user list");
                with_retry(&retry, || {
                    let source = Arc::clone(&source);
                    async move { source.list_users().await }
                })
                .await
                .map(Arc::new)
            })
            .await
            .map_err(|e: Arc<RetryError<ClientError>>| {
                warn!(error = %e, "Failed to load user list");
                AppError::UsersUnavailable(e.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::MockSocialDataSource;
    use std::time::Duration;

    fn config(ttl_secs: u64, retries: u32) -> CacheConfig {
        CacheConfig {
            users_ttl_secs: ttl_secs,
            users_retries: retries,
            users_retry_backoff_ms: 0,
        }
    }

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let mut source = MockSocialDataSource::new();
        source
            .expect_list_users()
            .times(1)
            .returning(|| Ok(UserDirectory::from_entries(vec![("1", "Alice")])));

        let cache = UserDirectoryCache::new(Arc::new(source), &config(30, 1));
        let first = cache.users().await.unwrap();
        let second = cache.users().await.unwrap();

        assert_eq!(first.len(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_single_retry_then_success() {
        let mut source = MockSocialDataSource::new();
        let mut seq = mockall::Sequence::new();
        source
            .expect_list_users()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(ClientError::Transport("reset".into())));
        source
            .expect_list_users()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(UserDirectory::from_entries(vec![("2", "Bob")])));

        let cache = UserDirectoryCache::new(Arc::new(source), &config(30, 1));
        let users = cache.users().await.unwrap();
        assert_eq!(users.name_of("2"), Some("Bob"));
    }

    #[tokio::test]
    async fn test_failure_after_retry_surfaces_and_is_not_cached() {
        let mut source = MockSocialDataSource::new();
        source
            .expect_list_users()
            .times(4)
            .returning(|| Err(ClientError::Timeout(Duration::from_secs(5))));

        let cache = UserDirectoryCache::new(Arc::new(source), &config(30, 1));
        assert!(matches!(
            cache.users().await,
            Err(AppError::UsersUnavailable(_))
        ));
        // Errors are not stored, the next read loads again
        assert!(cache.users().await.is_err());
    }

    #[tokio::test]
    async fn test_retry_waits_for_backoff() {
        let mut source = MockSocialDataSource::new();
        let mut seq = mockall::Sequence::new();
        source
            .expect_list_users()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(ClientError::Transport("reset".into())));
        source
            .expect_list_users()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(UserDirectory::from_entries(vec![("1", "Alice")])));

        let cache = UserDirectoryCache::new(
            Arc::new(source),
            &CacheConfig {
                users_retry_backoff_ms: 100,
                ..config(30, 1)
            },
        );

        let start = std::time::Instant::now();
        cache.users().await.unwrap();
        // ±30% jitter around 100ms
        assert!(start.elapsed() >= Duration::from_millis(70));
    }
}
