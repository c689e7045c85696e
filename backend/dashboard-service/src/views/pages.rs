use rand::Rng;

use super::components::{
    empty_state, hours_ago, loading_state, post_card, user_card, PostCardProps,
};
use super::{layout, Page};
use crate::models::{RankedUser, TrendingPost};
use crate::state::{FeedSnapshot, ViewModel, ViewPhase};

fn page_head(title: &str, subtitle: &str, action: &str) -> String {
    format!(
        r#"<div class="page-head">
    <div><h1>{}</h1><p>{}</p></div>
    {}
</div>"#,
        title, subtitle, action
    )
}

pub fn feed_page<R: Rng>(feed: &FeedSnapshot, now_millis: i64, rng: &mut R) -> String {
    let disabled = if feed.refreshing { " disabled" } else { "" };
    let refresh = format!(
        r#"<form method="post" action="/feed/refresh"><button type="submit" class="refresh"{}>&#8635; Refresh</button></form>"#,
        disabled
    );
    let mut body = page_head("Feed", "Latest posts from your network", &refresh);

    if feed.phase == ViewPhase::Failed {
        body.push_str(&empty_state(
            "Error loading feed",
            Some("There was an error fetching the feed data. Please try again later."),
        ));
        return layout(Page::Feed, &body);
    }

    if feed.refreshing {
        body.push_str(r#"<div class="banner">Refreshing feed...</div>"#);
    }

    let computing = matches!(feed.phase, ViewPhase::Loading | ViewPhase::Computing);
    if feed.items.is_empty() {
        if computing {
            body.push_str(&loading_state("Loading feed..."));
        } else {
            body.push_str(&empty_state(
                "Your feed is empty",
                Some("There are no posts to display right now."),
            ));
        }
        return layout(Page::Feed, &body);
    }

    body.push_str(r#"<div class="stack">"#);
    for item in &feed.items {
        let props = PostCardProps {
            post: &item.post,
            user_name: &item.user_name,
            comment_count: item.comment_count,
            trending: false,
            rank: None,
            hours_ago: Some(hours_ago(item.timestamp, now_millis)),
        };
        body.push_str(&post_card(&props, rng));
    }
    body.push_str("</div>");

    if computing {
        body.push_str(&loading_state("Loading more posts..."));
    }

    layout(Page::Feed, &body)
}

pub fn top_users_page(model: &ViewModel<Vec<RankedUser>>) -> String {
    let mut body = page_head("Top Users", "Users with the most commented posts", "");

    match (model.phase(), model.data()) {
        (ViewPhase::Failed, _) => body.push_str(&empty_state(
            "Error loading users",
            Some("There was an error fetching the user data. Please try again later."),
        )),
        (ViewPhase::Ready, Some(users)) if !users.is_empty() => {
            body.push_str(r#"<div class="stack">"#);
            for (index, user) in users.iter().enumerate() {
                body.push_str(&user_card(user, index + 1));
            }
            body.push_str("</div>");
        }
        (ViewPhase::Ready, _) => body.push_str(&empty_state(
            "No user data available",
            Some("We couldn't find any users with comments."),
        )),
        _ => body.push_str(&loading_state("Calculating top users...")),
    }

    layout(Page::TopUsers, &body)
}

pub fn trending_page<R: Rng>(model: &ViewModel<Vec<TrendingPost>>, rng: &mut R) -> String {
    let mut body = page_head("Trending Posts", "Posts with the most comments", "");

    match (model.phase(), model.data()) {
        (ViewPhase::Failed, _) => body.push_str(&empty_state(
            "Error loading posts",
            Some("There was an error fetching the post data. Please try again later."),
        )),
        (ViewPhase::Ready, Some(posts)) if !posts.is_empty() => {
            body.push_str(r#"<div class="stack">"#);
            for (index, trending) in posts.iter().enumerate() {
                let props = PostCardProps {
                    post: &trending.post,
                    user_name: &trending.user_name,
                    comment_count: trending.comment_count,
                    trending: true,
                    rank: Some(index + 1),
                    hours_ago: None,
                };
                body.push_str(&post_card(&props, rng));
            }
            body.push_str("</div>");
        }
        (ViewPhase::Ready, _) => body.push_str(&empty_state(
            "No trending posts available",
            Some("We couldn't find any posts with comments."),
        )),
        _ => body.push_str(&loading_state("Finding trending posts...")),
    }

    layout(Page::Trending, &body)
}
