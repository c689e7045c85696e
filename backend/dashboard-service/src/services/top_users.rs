//! Top users by total (synthesized) comments on their posts

use tracing::debug;

use super::collector::{PostCollector, UserPosts};
use super::engagement::EngagementSimulator;
use crate::error::Result;
use crate::models::{RankedUser, UserDirectory};

pub const DEFAULT_TOP_USERS_LIMIT: usize = 5;

/// Sum a synthesized comment count over each user's posts.
///
/// Users whose fetch failed have no posts and total 0; they stay in the list.
pub fn score_users(batches: Vec<UserPosts>, sim: &mut EngagementSimulator) -> Vec<RankedUser> {
    batches
        .into_iter()
        .map(|batch| {
            let total_comments = batch.posts.iter().map(|p| sim.comment_count(p)).sum();
            RankedUser {
                id: batch.user.id,
                name: batch.user.name,
                total_comments,
            }
        })
        .collect()
}

/// Sort by total descending and keep the first `limit`.
///
/// The sort is stable, so ties keep directory order.
pub fn rank_users(mut scored: Vec<RankedUser>, limit: usize) -> Vec<RankedUser> {
    scored.sort_by(|a, b| b.total_comments.cmp(&a.total_comments));
    scored.truncate(limit);
    scored
}

pub async fn compute_top_users(
    collector: &PostCollector<'_>,
    users: &UserDirectory,
    sim: &mut EngagementSimulator,
    limit: usize,
) -> Result<Vec<RankedUser>> {
    let batches = collector.collect(users.iter().cloned()).await?;
    let ranked = rank_users(score_users(batches, sim), limit);

    debug!(
        users = users.len(),
        ranked = ranked.len(),
        "Top users calculated"
    );
    Ok(ranked)
}
