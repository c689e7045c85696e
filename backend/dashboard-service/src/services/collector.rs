//! Per-user post fetching shared by every view
//!
//! Users are processed in directory order and results come back in that same
//! order regardless of how many fetches run at once. A failed fetch is logged
//! and counts as "no posts". Between fetches the abandon signal is checked so
//! work for a visitor who already left stops issuing requests.

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::clients::SocialDataSource;
use crate::error::{AppError, Result};
use crate::models::{Post, User};
use crate::state::AbandonSignal;

/// One user's posts as fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPosts {
    pub user: User,
    pub posts: Vec<Post>,
}

pub struct PostCollector<'a> {
    source: &'a dyn SocialDataSource,
    concurrency: usize,
    signal: AbandonSignal,
}

impl<'a> PostCollector<'a> {
    pub fn new(source: &'a dyn SocialDataSource, concurrency: usize, signal: AbandonSignal) -> Self {
        Self {
            source,
            concurrency: concurrency.max(1),
            signal,
        }
    }

    /// Fetch posts for each user, preserving input order
    pub async fn collect<I>(&self, users: I) -> Result<Vec<UserPosts>>
    where
        I: IntoIterator<Item = User>,
    {
        if self.signal.is_abandoned() {
            return Err(AppError::Abandoned);
        }

        let source = self.source;
        let mut fetches = stream::iter(users.into_iter().map(|user| async move {
            let posts = match source.list_user_posts(&user.id).await {
                Ok(posts) => posts,
                Err(e) => {
                    warn!(user_id = %user.id, error = %e, "Error fetching posts for user");
                    Vec::new()
                }
            };
            UserPosts { user, posts }
        }))
        .buffered(self.concurrency);

        let mut collected = Vec::new();
        while let Some(batch) = fetches.next().await {
            collected.push(batch);
            if self.signal.is_abandoned() {
                debug!(fetched = collected.len(), "Post collection abandoned");
                return Err(AppError::Abandoned);
            }
        }

        Ok(collected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{ClientError, MockSocialDataSource};
    use crate::state::abandon_pair;

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            name: format!("User {}", id),
        }
    }

    fn post(id: i64, user_id: &str) -> Post {
        Post {
            id,
            user_id: user_id.to_string(),
            content: String::new(),
        }
    }

    #[tokio::test]
    async fn test_failed_user_contributes_no_posts() {
        let mut source = MockSocialDataSource::new();
        source
            .expect_list_user_posts()
            .withf(|id| id == "1")
            .returning(|_| Ok(vec![post(101, "1")]));
        source
            .expect_list_user_posts()
            .withf(|id| id == "2")
            .returning(|_| Err(ClientError::Transport("boom".into())));

        let collector = PostCollector::new(&source, 1, AbandonSignal::never());
        let batches = collector.collect(vec![user("1"), user("2")]).await.unwrap();

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].posts, vec![post(101, "1")]);
        assert_eq!(batches[1].user.id, "2");
        assert!(batches[1].posts.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_fetches_keep_directory_order() {
        let mut source = MockSocialDataSource::new();
        source
            .expect_list_user_posts()
            .returning(|id| Ok(vec![post(id.parse::<i64>().unwrap() * 100, id)]));

        let users: Vec<User> = (1..=8).map(|i| user(&i.to_string())).collect();
        let collector = PostCollector::new(&source, 4, AbandonSignal::never());
        let batches = collector.collect(users).await.unwrap();

        let ids: Vec<&str> = batches.iter().map(|b| b.user.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6", "7", "8"]);
    }

    #[tokio::test]
    async fn test_abandoned_before_start_issues_no_requests() {
        let mut source = MockSocialDataSource::new();
        source.expect_list_user_posts().times(0);

        let (handle, signal) = abandon_pair();
        handle.abandon();

        let collector = PostCollector::new(&source, 1, signal);
        let result = collector.collect(vec![user("1"), user("2")]).await;
        assert!(matches!(result, Err(AppError::Abandoned)));
    }

    #[tokio::test]
    async fn test_abandon_mid_collection_stops_further_requests() {
        let (handle, signal) = abandon_pair();
        let handle = std::sync::Mutex::new(Some(handle));

        let mut source = MockSocialDataSource::new();
        source
            .expect_list_user_posts()
            .times(1)
            .returning(move |_| {
                // Visitor leaves while the first request is in flight
                if let Some(h) = handle.lock().unwrap().take() {
                    h.abandon();
                }
                Ok(Vec::new())
            });

        let collector = PostCollector::new(&source, 1, signal);
        let result = collector
            .collect(vec![user("1"), user("2"), user("3")])
            .await;
        assert!(matches!(result, Err(AppError::Abandoned)));
    }
}
