use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

/// Ordered `user id -> display name` mapping.
///
/// Iteration order matches how the dashboard has always walked the user map:
/// keys that are canonical array indices (`"0"`, `"7"`, `"42"`, but not `"007"`)
/// come first in ascending numeric order, every other key follows in arrival
/// order. Rankings use this order to break ties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut users: Vec<User> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();

        for (id, name) in entries {
            let id = id.into();
            let name = name.into();
            match slots.get(&id) {
                // Duplicate key: keep the slot, take the later value
                Some(&slot) => users[slot].name = name,
                None => {
                    slots.insert(id.clone(), users.len());
                    users.push(User { id, name });
                }
            }
        }

        let (mut indexed, named): (Vec<User>, Vec<User>) = users
            .into_iter()
            .partition(|u| array_index(&u.id).is_some());
        indexed.sort_by_key(|u| array_index(&u.id));
        indexed.extend(named);

        Self { users: indexed }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn name_of(&self, user_id: &str) -> Option<&str> {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.name.as_str())
    }
}

fn array_index(key: &str) -> Option<u32> {
    let n: u32 = key.parse().ok()?;
    (n != u32::MAX && n.to_string() == key).then_some(n)
}

impl Serialize for UserDirectory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.users.len()))?;
        for user in &self.users {
            map.serialize_entry(&user.id, &user.name)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for UserDirectory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DirectoryVisitor;

        impl<'de> Visitor<'de> for DirectoryVisitor {
            type Value = UserDirectory;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of user id to user name")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                let mut entries: Vec<(String, String)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((id, name)) = access.next_entry::<String, String>()? {
                    entries.push((id, name));
                }
                Ok(UserDirectory::from_entries(entries))
            }
        }

        deserializer.deserialize_map(DirectoryVisitor)
    }
}

/// Identifier the social API may send either as a JSON string or a number
#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(i64),
    Text(String),
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match WireId::deserialize(deserializer)? {
        WireId::Number(n) => n.to_string(),
        WireId::Text(s) => s,
    })
}

fn id_as_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match WireId::deserialize(deserializer)? {
        WireId::Number(n) => Ok(n),
        WireId::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid numeric id {:?}", s))),
    }
}

/// Post as served by the social API (`userid` on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(deserialize_with = "id_as_i64")]
    pub id: i64,
    #[serde(rename = "userid", alias = "userId", deserialize_with = "id_as_string")]
    pub user_id: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(deserialize_with = "id_as_i64")]
    pub id: i64,
    #[serde(
        rename = "postid",
        alias = "postId",
        default,
        deserialize_with = "id_as_i64"
    )]
    pub post_id: i64,
    #[serde(default)]
    pub content: String,
}

/// Wire envelope for `GET /users`
#[derive(Debug, Deserialize)]
pub struct UsersEnvelope {
    pub users: UserDirectory,
}

/// Wire envelope for `GET /users/{id}/posts`
#[derive(Debug, Deserialize)]
pub struct PostsEnvelope {
    #[serde(default)]
    pub posts: Vec<Post>,
}

/// Wire envelope for `GET /posts/{id}/comments`
#[derive(Debug, Deserialize)]
pub struct CommentsEnvelope {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedUser {
    pub id: String,
    pub name: String,
    pub total_comments: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingPost {
    pub post: Post,
    pub user_name: String,
    pub comment_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub post: Post,
    pub user_name: String,
    pub comment_count: u64,
    /// Synthesized creation time, milliseconds since the Unix epoch
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUsersResponse {
    pub users: Vec<RankedUser>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingResponse {
    pub posts: Vec<TrendingPost>,
    pub count: usize,
    pub max_comments: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub items: Vec<FeedItem>,
    pub count: usize,
    pub sampled_user_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_ids_accept_numbers_or_strings() {
        let envelope: PostsEnvelope = serde_json::from_str(
            r#"{"posts": [
                {"id": 246, "userid": 1, "content": "numeric owner"},
                {"id": "247", "userid": "1", "content": "string ids"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(envelope.posts[0].id, 246);
        assert_eq!(envelope.posts[0].user_id, "1");
        assert_eq!(envelope.posts[1].id, 247);
        assert_eq!(envelope.posts[1].user_id, "1");

        let comment: Comment =
            serde_json::from_str(r#"{"id": 9, "postid": "246", "content": "hi"}"#).unwrap();
        assert_eq!(comment.post_id, 246);

        assert!(serde_json::from_str::<Post>(r#"{"id": "abc", "userid": 1}"#).is_err());
    }

    #[test]
    fn test_directory_orders_numeric_keys_first() {
        let directory = UserDirectory::from_entries(vec![
            ("bob", "Bob"),
            ("10", "Ten"),
            ("2", "Two"),
            ("007", "Bond"),
            ("alice", "Alice"),
        ]);

        let ids: Vec<&str> = directory.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "10", "bob", "007", "alice"]);
    }

    #[test]
    fn test_directory_duplicate_key_keeps_slot_takes_last_value() {
        let directory =
            UserDirectory::from_entries(vec![("a", "First"), ("b", "B"), ("a", "Second")]);

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.users()[0].id, "a");
        assert_eq!(directory.name_of("a"), Some("Second"));
    }

    #[test]
    fn test_users_envelope_deserializes_in_traversal_order() {
        let json = r#"{"users":{"3":"Charlie","1":"Alice","x":"Xavier","2":"Bob"}}"#;
        let envelope: UsersEnvelope = serde_json::from_str(json).unwrap();

        let names: Vec<&str> = envelope.users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Charlie", "Xavier"]);
    }

    #[test]
    fn test_directory_serializes_as_map() {
        let directory = UserDirectory::from_entries(vec![("1", "Alice")]);
        let value = serde_json::to_value(&directory).unwrap();
        assert_eq!(value, serde_json::json!({"1": "Alice"}));
    }

    #[test]
    fn test_post_reads_lowercase_userid() {
        let post: Post =
            serde_json::from_str(r#"{"id":101,"userid":"1","content":"hello"}"#).unwrap();
        assert_eq!(post.user_id, "1");

        let camel: Post = serde_json::from_str(r#"{"id":5,"userId":"9"}"#).unwrap();
        assert_eq!(camel.user_id, "9");
        assert!(camel.content.is_empty());
    }

    #[test]
    fn test_feed_item_serializes_camel_case() {
        let item = FeedItem {
            post: Post {
                id: 1,
                user_id: "1".into(),
                content: "x".into(),
            },
            user_name: "Alice".into(),
            comment_count: 3,
            timestamp: 1_700_000_000_000,
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["userName"], "Alice");
        assert_eq!(value["commentCount"], 3);
        assert_eq!(value["post"]["userid"], "1");
    }
}
