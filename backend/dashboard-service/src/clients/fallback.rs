//! Sample data served when the social API cannot be reached

use crate::models::{Post, UserDirectory};

const SAMPLE_USERS: [(&str, &str); 5] = [
    ("1", "Alice"),
    ("2", "Bob"),
    ("3", "Charlie"),
    ("4", "Diana"),
    ("5", "Eve"),
];

const SAMPLE_POSTS: [(i64, &str, &str); 6] = [
    (101, "1", "Alice's first post"),
    (102, "1", "Alice's second post"),
    (201, "2", "Bob's first post"),
    (301, "3", "Charlie's post"),
    (401, "4", "Diana's post"),
    (501, "5", "Eve's post"),
];

pub fn sample_users() -> UserDirectory {
    UserDirectory::from_entries(SAMPLE_USERS)
}

/// Sample posts for `user_id`, empty for ids outside the sample table
pub fn sample_posts(user_id: &str) -> Vec<Post> {
    SAMPLE_POSTS
        .iter()
        .filter(|(_, author, _)| *author == user_id)
        .map(|(id, author, content)| Post {
            id: *id,
            user_id: author.to_string(),
            content: content.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_users() {
        let users = sample_users();
        assert_eq!(users.len(), 5);
        assert_eq!(users.name_of("1"), Some("Alice"));
        assert_eq!(users.name_of("5"), Some("Eve"));
    }

    #[test]
    fn test_sample_posts_per_user() {
        let alice: Vec<i64> = sample_posts("1").iter().map(|p| p.id).collect();
        assert_eq!(alice, vec![101, 102]);
        assert_eq!(sample_posts("2").len(), 1);
        assert!(sample_posts("99").is_empty());
        assert!(sample_posts("1").iter().all(|p| p.user_id == "1"));
    }
}
