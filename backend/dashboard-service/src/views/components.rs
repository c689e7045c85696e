//! Cards and page states shared by the dashboard pages

use rand::Rng;

use super::escape_html;
use crate::models::{Post, RankedUser};

/// Characters of post content shown before "Read more"
pub const CONTENT_PREVIEW_CHARS: usize = 150;

pub const AVATAR_PLACEHOLDER: &str = "https://images.pexels.com/photos/1722198/pexels-photo-1722198.jpeg?auto=compress&cs=tinysrgb&w=150&h=150&dpr=1";
pub const POST_IMAGE_PLACEHOLDER: &str = "https://images.pexels.com/photos/3861969/pexels-photo-3861969.jpeg?auto=compress&cs=tinysrgb&w=600&h=400&dpr=1";

pub fn avatar_url(user_id: &str) -> String {
    let photo = 1000 + user_id.parse::<i64>().unwrap_or(0) * 13;
    format!(
        "https://images.pexels.com/photos/{photo}/pexels-photo-{photo}.jpeg?auto=compress&cs=tinysrgb&w=150&h=150&dpr=1"
    )
}

pub fn post_image_url(post_id: i64) -> String {
    let photo = 5000 + post_id * 7;
    format!(
        "https://images.pexels.com/photos/{photo}/pexels-photo-{photo}.jpeg?auto=compress&cs=tinysrgb&w=600&h=400&dpr=1"
    )
}

fn image(src: &str, alt: &str, class: &str, placeholder: &str) -> String {
    format!(
        r#"<img src="{}" alt="{}" class="{}" onerror="this.onerror=null;this.src='{}'">"#,
        escape_html(src),
        escape_html(alt),
        class,
        placeholder
    )
}

/// Whole hours between `timestamp` and `now`, both in epoch milliseconds
pub fn hours_ago(timestamp: i64, now: i64) -> i64 {
    ((now - timestamp) / 3_600_000).max(0)
}

/// Everything a post card needs besides the decorative numbers
#[derive(Debug, Clone, Copy)]
pub struct PostCardProps<'a> {
    pub post: &'a Post,
    pub user_name: &'a str,
    pub comment_count: u64,
    pub trending: bool,
    pub rank: Option<usize>,
    /// `None` picks a random age under a day
    pub hours_ago: Option<i64>,
}

pub fn post_card<R: Rng>(props: &PostCardProps<'_>, rng: &mut R) -> String {
    let PostCardProps {
        post,
        user_name,
        comment_count,
        trending,
        rank,
        hours_ago,
    } = *props;

    let hours = hours_ago.unwrap_or_else(|| rng.gen_range(0..24));
    let likes: u32 = rng.gen_range(0..50) + 5;
    let shares: u32 = rng.gen_range(0..10);

    let (card_class, badge) = if trending {
        ("card trending", r#"<div class="badge">&#128293; Trending</div>"#)
    } else {
        ("card", "")
    };
    let rank_attr = rank
        .map(|r| format!(r#" data-rank="{}""#, r))
        .unwrap_or_default();

    format!(
        r#"<article class="{card_class}" data-post-id="{post_id}"{rank_attr}>
    {badge}
    <div class="card-body">
        <div class="author">
            {avatar}
            <div><h3>{user_name}</h3><small>{hours}h ago</small></div>
        </div>
        {content}
        {post_image}
        <div class="stats">
            <span>{likes} likes</span>
            <span>{comment_count} comments</span>
            <span>{shares} shares</span>
        </div>
    </div>
</article>"#,
        post_id = post.id,
        avatar = image(&avatar_url(&post.user_id), user_name, "avatar", AVATAR_PLACEHOLDER),
        user_name = escape_html(user_name),
        content = post_content(&post.content),
        post_image = image(
            &post_image_url(post.id),
            "Post content",
            "post-image",
            POST_IMAGE_PLACEHOLDER
        ),
    )
}

/// Post text, folded behind "Read more" past the preview length
fn post_content(content: &str) -> String {
    if content.chars().count() <= CONTENT_PREVIEW_CHARS {
        return format!(r#"<p class="content">{}</p>"#, escape_html(content));
    }

    let preview: String = content.chars().take(CONTENT_PREVIEW_CHARS).collect();
    format!(
        r#"<p class="content">{}...</p>
        <details><summary>Read more</summary><p class="content">{}</p></details>"#,
        escape_html(&preview),
        escape_html(content)
    )
}

pub fn user_card(user: &RankedUser, rank: usize) -> String {
    format!(
        r#"<article class="card" data-user-id="{id}" data-rank="{rank}">
    <div class="user-card">
        <div class="user-avatar">
            {avatar}
            <div class="rank">{rank}</div>
        </div>
        <div class="user-info">
            <h3>{name}</h3>
            <span>ID: {id}</span>
        </div>
        <div class="score"><strong>{total}</strong><span>Comments</span></div>
    </div>
    <div class="stripe"></div>
</article>"#,
        id = escape_html(&user.id),
        rank = rank,
        avatar = image(&avatar_url(&user.id), &user.name, "", AVATAR_PLACEHOLDER),
        name = escape_html(&user.name),
        total = user.total_comments,
    )
}

pub fn empty_state(message: &str, sub_message: Option<&str>) -> String {
    let sub = sub_message
        .map(|s| format!("<p>{}</p>", escape_html(s)))
        .unwrap_or_default();
    format!(
        r#"<div class="state empty"><h3>{}</h3>{}</div>"#,
        escape_html(message),
        sub
    )
}

pub fn loading_state(message: &str) -> String {
    format!(
        r#"<div class="state loading"><div class="dots"><span></span><span></span><span></span></div><p>{}</p></div>"#,
        escape_html(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn post(content: &str) -> Post {
        Post {
            id: 101,
            user_id: "1".into(),
            content: content.into(),
        }
    }

    #[test]
    fn test_image_urls() {
        assert!(avatar_url("1").contains("/photos/1013/pexels-photo-1013.jpeg"));
        assert!(avatar_url("abc").contains("/photos/1000/"));
        assert!(post_image_url(101).contains("/photos/5707/pexels-photo-5707.jpeg"));
        assert!(post_image_url(101).contains("w=600&h=400"));
    }

    #[test]
    fn test_long_content_is_folded() {
        let long = "x".repeat(200);
        let p = post(&long);
        let props = PostCardProps {
            post: &p,
            user_name: "Alice",
            comment_count: 3,
            trending: false,
            rank: None,
            hours_ago: Some(2),
        };
        let html = post_card(&props, &mut StdRng::seed_from_u64(1));

        assert!(html.contains(&format!("{}...", "x".repeat(150))));
        assert!(html.contains("Read more"));
        assert!(html.contains("2h ago"));
        assert!(html.contains("3 comments"));
        assert!(!html.contains("Trending"));
    }

    #[test]
    fn test_trending_card_escapes_and_badges() {
        let p = post("<script>alert(1)</script>");
        let props = PostCardProps {
            post: &p,
            user_name: "Bob & Co",
            comment_count: 9,
            trending: true,
            rank: Some(1),
            hours_ago: None,
        };
        let html = post_card(&props, &mut StdRng::seed_from_u64(2));

        assert!(html.contains("Trending"));
        assert!(html.contains(r#"data-rank="1""#));
        assert!(html.contains("Bob &amp; Co"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("Read more"));
        assert!(html.contains(POST_IMAGE_PLACEHOLDER));
    }

    #[test]
    fn test_user_card() {
        let user = RankedUser {
            id: "7".into(),
            name: "Grace".into(),
            total_comments: 42,
        };
        let html = user_card(&user, 3);
        assert!(html.contains("ID: 7"));
        assert!(html.contains("<strong>42</strong>"));
        assert!(html.contains(r#"<div class="rank">3</div>"#));
        assert!(html.contains(AVATAR_PLACEHOLDER));
    }

    #[test]
    fn test_hours_ago() {
        let now = 1_700_000_000_000;
        assert_eq!(hours_ago(now - 3 * 3_600_000 - 5, now), 3);
        assert_eq!(hours_ago(now + 10, now), 0);
    }
}
