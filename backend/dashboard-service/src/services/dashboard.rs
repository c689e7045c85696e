//! Drives each page's view-model through its lifecycle
//!
//! Every computation loads the (cached) user list, then derives its data from
//! fresh per-user post fetches. A failed user list leaves the model `Failed`;
//! an abandoned computation is rolled back and reported as
//! [`AppError::Abandoned`] so callers drop it silently.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::collector::PostCollector;
use super::engagement::{EngagementSeed, View};
use super::feed::{assemble_feed, merge_feed};
use super::top_users::compute_top_users;
use super::trending::compute_trending;
use crate::cache::UserDirectoryCache;
use crate::config::DashboardConfig;
use crate::error::{AppError, Result};
use crate::models::{RankedUser, TrendingPost, UserDirectory};
use crate::state::{AbandonSignal, FeedSession, ViewModel, ViewPhase};

/// What a feed refresh request ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Completed {
        sampled_user_ids: Vec<String>,
        fetched: usize,
    },
    /// Another refresh for the same session is still running
    InProgress,
    /// User list unavailable; the session model is `Failed`
    Failed,
}

#[derive(Clone)]
pub struct DashboardService {
    users: UserDirectoryCache,
    seed: EngagementSeed,
    settings: DashboardConfig,
}

impl DashboardService {
    pub fn new(users: UserDirectoryCache, settings: DashboardConfig) -> Self {
        Self {
            users,
            seed: match settings.engagement_seed {
                Some(seed) => EngagementSeed::fixed(seed),
                None => EngagementSeed::entropy(),
            },
            settings,
        }
    }

    pub fn seed(&self) -> EngagementSeed {
        self.seed
    }

    pub fn settings(&self) -> &DashboardConfig {
        &self.settings
    }

    /// Whether the user list can currently be loaded
    pub async fn users_ready(&self) -> bool {
        self.users.users().await.is_ok()
    }

    pub async fn top_users(&self, signal: AbandonSignal) -> Result<ViewModel<Vec<RankedUser>>> {
        let (mut model, users) = self.begin_view().await?;
        let Some(users) = users else {
            return Ok(model);
        };

        let source = self.users.source();
        let collector = PostCollector::new(source.as_ref(), self.settings.fetch_concurrency, signal);
        let mut sim = self.seed.simulator(View::TopUsers);
        let result =
            compute_top_users(&collector, &users, &mut sim, self.settings.top_users_limit).await;

        Self::finish_view(View::TopUsers, &mut model, result)?;
        Ok(model)
    }

    pub async fn trending(&self, signal: AbandonSignal) -> Result<ViewModel<Vec<TrendingPost>>> {
        let (mut model, users) = self.begin_view().await?;
        let Some(users) = users else {
            return Ok(model);
        };

        let source = self.users.source();
        let collector = PostCollector::new(source.as_ref(), self.settings.fetch_concurrency, signal);
        let mut sim = self.seed.simulator(View::Trending);
        let result = compute_trending(&collector, &users, &mut sim).await;

        Self::finish_view(View::Trending, &mut model, result)?;
        Ok(model)
    }

    /// `Idle -> Loading -> Computing`, or `Failed` with no users
    async fn begin_view<T>(&self) -> Result<(ViewModel<T>, Option<Arc<UserDirectory>>)> {
        let mut model = ViewModel::new();
        model.start_loading()?;

        match self.users.users().await {
            Ok(users) => {
                model.start_computing()?;
                Ok((model, Some(users)))
            }
            Err(e) => {
                model.fail(e.to_string())?;
                Ok((model, None))
            }
        }
    }

    fn finish_view<T>(view: View, model: &mut ViewModel<T>, result: Result<T>) -> Result<()> {
        match result {
            Ok(data) => Ok(model.finish(data)?),
            Err(AppError::Abandoned) => {
                debug!(?view, "View computation abandoned");
                model.cancel();
                Err(AppError::Abandoned)
            }
            Err(e) => {
                warn!(?view, error = %e, "View computation failed");
                Ok(model.fail(e.to_string())?)
            }
        }
    }

    /// Compute a new feed batch for `session` and merge it into what it shows.
    ///
    /// Only one refresh runs per session; a second request while one is in
    /// flight returns [`RefreshOutcome::InProgress`] without doing anything.
    pub async fn refresh_feed(&self, session: &FeedSession) -> Result<RefreshOutcome> {
        let Some(_guard) = session.try_begin_refresh() else {
            debug!(session_id = %session.id(), "Feed refresh already running");
            return Ok(RefreshOutcome::InProgress);
        };

        // Ready feeds go straight to Computing and keep showing their items;
        // anything else loads the user list first
        let reloading = session
            .update(|model| match model.phase() {
                ViewPhase::Ready => model.start_computing().map(|_| false),
                _ => model.start_loading().map(|_| true),
            })
            .await?;

        let users = match self.users.users().await {
            Ok(users) => users,
            Err(e) => {
                let reason = e.to_string();
                session.update(|model| model.fail(reason)).await?;
                return Ok(RefreshOutcome::Failed);
            }
        };

        if reloading {
            session.update(|model| model.start_computing()).await?;
        }

        let source = self.users.source();
        let collector = PostCollector::new(
            source.as_ref(),
            self.settings.fetch_concurrency,
            session.signal(),
        );
        let mut sim = self.seed.simulator(View::Feed);
        let now = Utc::now().timestamp_millis();

        let batch = match assemble_feed(
            &collector,
            &users,
            self.settings.feed_sample_size,
            &mut sim,
            now,
        )
        .await
        {
            Ok(batch) => batch,
            Err(AppError::Abandoned) => {
                session.update(|model| model.cancel()).await;
                debug!(session_id = %session.id(), "Feed refresh abandoned");
                return Err(AppError::Abandoned);
            }
            Err(e) => {
                let reason = e.to_string();
                session.update(|model| model.fail(reason)).await?;
                return Ok(RefreshOutcome::Failed);
            }
        };

        let fetched = batch.items.len();
        let total = session
            .update(|model| {
                if session.is_abandoned() {
                    model.cancel();
                    return Err(AppError::Abandoned);
                }
                let previous = model.take_data().unwrap_or_default();
                let merged = merge_feed(batch.items, previous);
                let total = merged.len();
                model.finish(merged)?;
                Ok(total)
            })
            .await?;

        info!(
            session_id = %session.id(),
            sampled = batch.sampled_user_ids.len(),
            fetched,
            total,
            "Feed refreshed"
        );

        Ok(RefreshOutcome::Completed {
            sampled_user_ids: batch.sampled_user_ids,
            fetched,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{ClientError, MockSocialDataSource};
    use crate::config::CacheConfig;
    use crate::models::Post;
    use crate::state::abandon_pair;

    fn service(source: MockSocialDataSource, seed: Option<u64>) -> DashboardService {
        let cache = UserDirectoryCache::new(
            Arc::new(source),
            &CacheConfig {
                users_ttl_secs: 30,
                users_retries: 0,
                users_retry_backoff_ms: 0,
            },
        );
        DashboardService::new(
            cache,
            DashboardConfig {
                engagement_seed: seed,
                ..DashboardConfig::default()
            },
        )
    }

    fn alice_and_bob() -> MockSocialDataSource {
        let mut source = MockSocialDataSource::new();
        source
            .expect_list_users()
            .returning(|| Ok(UserDirectory::from_entries(vec![("1", "Alice"), ("2", "Bob")])));
        source.expect_list_user_posts().returning(|id| {
            Ok(match id {
                "1" => vec![Post {
                    id: 101,
                    user_id: "1".into(),
                    content: "Alice's first post".into(),
                }],
                _ => Vec::new(),
            })
        });
        source
    }

    #[tokio::test]
    async fn test_top_users_ready_with_alice_first() {
        let service = service(alice_and_bob(), None);
        let model = service.top_users(AbandonSignal::never()).await.unwrap();

        assert_eq!(model.phase(), ViewPhase::Ready);
        let users = model.data().unwrap();
        assert_eq!(users[0].name, "Alice");
        assert_eq!(users[1].total_comments, 0);
    }

    #[tokio::test]
    async fn test_user_list_failure_fails_the_view() {
        let mut source = MockSocialDataSource::new();
        source
            .expect_list_users()
            .returning(|| Err(ClientError::Transport("down".into())));

        let service = service(source, None);
        let model = service.trending(AbandonSignal::never()).await.unwrap();

        assert_eq!(model.phase(), ViewPhase::Failed);
        assert!(model.data().is_none());
        assert!(model.failure().is_some());
    }

    #[tokio::test]
    async fn test_abandoned_view_is_reported() {
        let service = service(alice_and_bob(), None);
        let (handle, signal) = abandon_pair();
        handle.abandon();

        assert!(matches!(
            service.top_users(signal).await,
            Err(AppError::Abandoned)
        ));
    }

    #[tokio::test]
    async fn test_feed_refreshes_accumulate_without_duplicates() {
        let service = service(alice_and_bob(), Some(5));
        let session = FeedSession::new();

        let first = service.refresh_feed(&session).await.unwrap();
        assert!(matches!(first, RefreshOutcome::Completed { fetched: 1, .. }));

        let second = service.refresh_feed(&session).await.unwrap();
        assert!(matches!(second, RefreshOutcome::Completed { .. }));

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.phase, ViewPhase::Ready);
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].post.id, 101);
        assert!(!snapshot.refreshing);
    }

    #[tokio::test]
    async fn test_concurrent_refresh_is_rejected() {
        let service = service(alice_and_bob(), None);
        let session = FeedSession::new();

        let _guard = session.try_begin_refresh().unwrap();
        assert_eq!(
            service.refresh_feed(&session).await.unwrap(),
            RefreshOutcome::InProgress
        );
        assert_eq!(session.snapshot().await.phase, ViewPhase::Idle);
    }

    #[tokio::test]
    async fn test_abandoned_feed_session_is_not_updated() {
        let service = service(alice_and_bob(), None);
        let session = FeedSession::new();
        session.abandon();

        assert!(matches!(
            service.refresh_feed(&session).await,
            Err(AppError::Abandoned)
        ));
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.phase, ViewPhase::Idle);
        assert!(snapshot.items.is_empty());
    }

    #[tokio::test]
    async fn test_feed_user_list_failure() {
        let mut source = MockSocialDataSource::new();
        source
            .expect_list_users()
            .returning(|| Err(ClientError::Status {
                status: 500,
                url: "http://api/users".into(),
            }));

        let service = service(source, None);
        let session = FeedSession::new();

        assert_eq!(
            service.refresh_feed(&session).await.unwrap(),
            RefreshOutcome::Failed
        );
        assert_eq!(session.snapshot().await.phase, ViewPhase::Failed);
    }
}
