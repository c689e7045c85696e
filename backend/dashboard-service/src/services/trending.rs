//! Trending posts: every post tied for the highest comment count

use tracing::debug;

use super::collector::{PostCollector, UserPosts};
use super::engagement::EngagementSimulator;
use crate::error::Result;
use crate::models::{TrendingPost, UserDirectory};

/// Attach a synthesized comment count to every fetched post, in traversal order
pub fn score_posts(batches: Vec<UserPosts>, sim: &mut EngagementSimulator) -> Vec<TrendingPost> {
    batches
        .into_iter()
        .flat_map(|batch| {
            let user_name = batch.user.name;
            batch
                .posts
                .into_iter()
                .map(move |post| (post, user_name.clone()))
        })
        .map(|(post, user_name)| {
            let comment_count = sim.comment_count(&post);
            TrendingPost {
                post,
                user_name,
                comment_count,
            }
        })
        .collect()
}

/// Keep exactly the posts whose count equals the maximum.
///
/// Not a top-N: one post or all of them may qualify. Empty in, empty out.
pub fn select_trending(scored: Vec<TrendingPost>) -> Vec<TrendingPost> {
    let Some(max) = scored.iter().map(|p| p.comment_count).max() else {
        return Vec::new();
    };

    scored
        .into_iter()
        .filter(|p| p.comment_count == max)
        .collect()
}

pub async fn compute_trending(
    collector: &PostCollector<'_>,
    users: &UserDirectory,
    sim: &mut EngagementSimulator,
) -> Result<Vec<TrendingPost>> {
    let batches = collector.collect(users.iter().cloned()).await?;
    let scored = score_posts(batches, sim);
    let candidates = scored.len();
    let trending = select_trending(scored);

    debug!(
        candidates,
        trending = trending.len(),
        max_comments = ?trending.first().map(|p| p.comment_count),
        "Trending posts selected"
    );
    Ok(trending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::MockSocialDataSource;
    use crate::models::Post;
    use crate::services::engagement::{EngagementSeed, View};
    use crate::state::AbandonSignal;

    fn scored(id: i64, count: u64) -> TrendingPost {
        TrendingPost {
            post: Post {
                id,
                user_id: "1".into(),
                content: format!("post {}", id),
            },
            user_name: "Alice".into(),
            comment_count: count,
        }
    }

    #[test]
    fn test_select_trending_returns_all_ties_at_max() {
        let picked = select_trending(vec![scored(1, 5), scored(2, 9), scored(3, 9)]);
        let ids: Vec<i64> = picked.iter().map(|p| p.post.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_select_trending_single_winner() {
        let picked = select_trending(vec![scored(1, 4), scored(2, 1), scored(3, 3)]);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].post.id, 1);
    }

    #[test]
    fn test_select_trending_empty() {
        assert!(select_trending(Vec::new()).is_empty());
    }

    #[tokio::test]
    async fn test_compute_trending_all_returned_counts_are_the_max() {
        let mut source = MockSocialDataSource::new();
        source.expect_list_user_posts().returning(|id| {
            let base: i64 = id.parse().unwrap();
            Ok((0..4)
                .map(|n| Post {
                    id: base * 100 + n,
                    user_id: id.to_string(),
                    content: String::new(),
                })
                .collect())
        });

        let users = UserDirectory::from_entries(vec![("1", "Alice"), ("2", "Bob"), ("3", "Charlie")]);
        let collector = PostCollector::new(&source, 1, AbandonSignal::never());
        let mut sim = EngagementSeed::entropy().simulator(View::Trending);

        let trending = compute_trending(&collector, &users, &mut sim).await.unwrap();

        assert!(!trending.is_empty());
        let max = trending[0].comment_count;
        assert!(trending.iter().all(|p| p.comment_count == max));
        assert!(trending
            .iter()
            .all(|p| users.name_of(&p.post.user_id) == Some(p.user_name.as_str())));
    }

    #[tokio::test]
    async fn test_compute_trending_without_posts_is_empty() {
        let mut source = MockSocialDataSource::new();
        source.expect_list_user_posts().returning(|_| Ok(Vec::new()));

        let users = UserDirectory::from_entries(vec![("1", "Alice")]);
        let collector = PostCollector::new(&source, 1, AbandonSignal::never());
        let mut sim = EngagementSeed::entropy().simulator(View::Trending);

        assert!(compute_trending(&collector, &users, &mut sim)
            .await
            .unwrap()
            .is_empty());
    }
}
