pub mod fallback;
pub mod social_api;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Post, UserDirectory};

pub use social_api::SocialApiClient;

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Malformed response body: {0}")]
    Decode(String),
}

/// Where the dashboard gets users and posts from.
///
/// The HTTP implementation absorbs every failure into sample data, so its calls
/// always return `Ok`. Other sources may fail; aggregation code treats a failed
/// post lookup as "no posts" and a failed user lookup as a page-level error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialDataSource: Send + Sync {
    async fn list_users(&self) -> Result<UserDirectory, ClientError>;

    async fn list_user_posts(&self, user_id: &str) -> Result<Vec<Post>, ClientError>;
}
