//! Feed assembly
//!
//! A refresh samples a few users at random, fetches only their posts, stamps
//! each post with a synthesized time and merges the batch into the feed the
//! visitor already has. Refreshing repeatedly widens coverage across different
//! samples.

use std::collections::HashMap;
use tracing::debug;

use super::collector::{PostCollector, UserPosts};
use super::engagement::EngagementSimulator;
use crate::error::Result;
use crate::models::{FeedItem, User, UserDirectory};

pub const DEFAULT_FEED_SAMPLE_SIZE: usize = 5;

/// Result of one feed refresh before it is merged
#[derive(Debug, Clone, Default)]
pub struct FeedBatch {
    pub items: Vec<FeedItem>,
    pub sampled_user_ids: Vec<String>,
}

/// Up to `size` distinct users: shuffle a copy, take the front
pub fn sample_users(users: &UserDirectory, size: usize, sim: &mut EngagementSimulator) -> Vec<User> {
    let mut pool = users.users().to_vec();
    sim.shuffle(&mut pool);
    pool.truncate(size);
    pool
}

/// Turn fetched posts into feed items, newest first
pub fn build_items(batches: Vec<UserPosts>, sim: &mut EngagementSimulator, now_millis: i64) -> Vec<FeedItem> {
    let mut items: Vec<FeedItem> = batches
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
            let timestamp = sim.timestamp_before(now_millis);
            FeedItem {
                post,
                user_name,
                comment_count,
                timestamp,
            }
        })
        .collect();

    sort_newest_first(&mut items);
    items
}

/// Merge a fresh batch into the items already shown.
///
/// Walks `fresh ++ previous` keyed by post id. The first time an id is seen it
/// takes a slot; a later occurrence replaces the value in that slot. So a post
/// present in both keeps the previously shown version. The result holds one
/// entry per id, newest first.
pub fn merge_feed(fresh: Vec<FeedItem>, previous: Vec<FeedItem>) -> Vec<FeedItem> {
    let mut merged: Vec<FeedItem> = Vec::with_capacity(fresh.len() + previous.len());
    let mut slots: HashMap<i64, usize> = HashMap::new();

    for item in fresh.into_iter().chain(previous) {
        match slots.get(&item.post.id) {
            Some(&slot) => merged[slot] = item,
            None => {
                slots.insert(item.post.id, merged.len());
                merged.push(item);
            }
        }
    }

    sort_newest_first(&mut merged);
    merged
}

fn sort_newest_first(items: &mut [FeedItem]) {
    // Stable: equal timestamps keep merge order
    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Sample, fetch and stamp one batch of feed items
pub async fn assemble_feed(
    collector: &PostCollector<'_>,
    users: &UserDirectory,
    sample_size: usize,
    sim: &mut EngagementSimulator,
    now_millis: i64,
) -> Result<FeedBatch> {
    let sampled = sample_users(users, sample_size, sim);
    let sampled_user_ids: Vec<String> = sampled.iter().map(|u| u.id.clone()).collect();

    let batches = collector.collect(sampled).await?;
    let items = build_items(batches, sim, now_millis);

    debug!(
        sampled = sampled_user_ids.len(),
        items = items.len(),
        "Feed batch assembled"
    );
    Ok(FeedBatch {
        items,
        sampled_user_ids,
    })
}
