//! HTTP client for the remote social-network API
//!
//! Endpoints consumed:
//! - `GET {base}/users` → `{ "users": { "<id>": "<name>" } }`
//! - `GET {base}/users/{id}/posts` → `{ "posts": [{ "id", "userid", "content" }] }`
//! - `GET {base}/posts/{id}/comments` → `{ "comments": [...] }`
//!
//! The `SocialDataSource` impl never fails: errors and timeouts are logged and
//! replaced with sample data from [`super::fallback`].

use async_trait::async_trait;
use reqwest::Client;
use resilience::{with_fallback, Degraded};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

use super::{fallback, ClientError, SocialDataSource};
use crate::config::SocialApiConfig;
use crate::metrics;
use crate::models::{
    Comment, CommentsEnvelope, Post, PostsEnvelope, UserDirectory, UsersEnvelope,
};

#[derive(Clone)]
pub struct SocialApiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl SocialApiClient {
    pub fn new(config: &SocialApiConfig) -> Result<Self, ClientError> {
        let timeout = config.timeout();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /users`, errors propagated
    pub async fn fetch_users(&self) -> Result<UserDirectory, ClientError> {
        let envelope: UsersEnvelope = self.get_json("users", "/users").await?;
        Ok(envelope.users)
    }

    /// `GET /users/{id}/posts`, errors propagated
    pub async fn fetch_user_posts(&self, user_id: &str) -> Result<Vec<Post>, ClientError> {
        let path = format!("/users/{}/posts", urlencoding::encode(user_id));
        let envelope: PostsEnvelope = self.get_json("user_posts", &path).await?;
        Ok(envelope.posts)
    }

    /// `GET /posts/{id}/comments`.
    ///
    /// No view reads real comments yet, and unlike the other calls there is no
    /// sample data behind it: failures are logged and returned.
    pub async fn list_post_comments(&self, post_id: i64) -> Result<Vec<Comment>, ClientError> {
        let path = format!("/posts/{}/comments", post_id);
        match self.get_json::<CommentsEnvelope>("post_comments", &path).await {
            Ok(envelope) => Ok(envelope.comments),
            Err(e) => {
                error!(post_id, error = %e, "Error fetching comments for post");
                Err(e)
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        path: &str,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "Calling social API");

        let result = self.send(&url).await;
        metrics::record_upstream_call(endpoint, result.is_ok());
        result
    }

    async fn send<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(self.timeout)
            } else {
                ClientError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(self.timeout)
            } else {
                ClientError::Transport(e.to_string())
            }
        })?;

        serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SocialDataSource for SocialApiClient {
    async fn list_users(&self) -> Result<UserDirectory, ClientError> {
        let users = with_fallback(
            "list_users",
            self.timeout,
            self.fetch_users(),
            fallback::sample_users,
        )
        .await;

        if let Degraded::Fallback(_) = &users {
            metrics::record_fallback("users");
        }
        Ok(users.into_inner())
    }

    async fn list_user_posts(&self, user_id: &str) -> Result<Vec<Post>, ClientError> {
        let posts = with_fallback(
            "list_user_posts",
            self.timeout,
            self.fetch_user_posts(user_id),
            || fallback::sample_posts(user_id),
        )
        .await;

        if posts.is_fallback() {
            debug!(user_id, "Serving sample posts");
            metrics::record_fallback("user_posts");
        }
        Ok(posts.into_inner())
    }
}
