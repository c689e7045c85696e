use anyhow::{Context, Result};
use resilience::DEFAULT_UPSTREAM_DEADLINE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_SOCIAL_API_BASE_URL: &str = "http://20.244.56.144/evaluation-service";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub social_api: SocialApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl SocialApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for SocialApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SOCIAL_API_BASE_URL.to_string(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Request cache for the user list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_users_ttl_secs")]
    pub users_ttl_secs: u64,
    #[serde(default = "default_users_retries")]
    pub users_retries: u32,
    /// Wait before retrying a failed user-list load (jittered)
    #[serde(default = "default_users_retry_backoff_ms")]
    pub users_retry_backoff_ms: u64,
}

impl CacheConfig {
    pub fn users_ttl(&self) -> Duration {
        Duration::from_secs(self.users_ttl_secs)
    }

    pub fn users_retry_backoff(&self) -> Duration {
        Duration::from_millis(self.users_retry_backoff_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            users_ttl_secs: default_users_ttl_secs(),
            users_retries: default_users_retries(),
            users_retry_backoff_ms: default_users_retry_backoff_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_sample_size")]
    pub feed_sample_size: usize,
    #[serde(default = "default_top_users_limit")]
    pub top_users_limit: usize,
    /// Per-user post fetches in flight at once; 1 keeps them strictly sequential
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
    /// Fixes the engagement generator; unset means a fresh entropy seed per pass
    #[serde(default)]
    pub engagement_seed: Option<u64>,
    #[serde(default = "default_feed_session_idle_secs")]
    pub feed_session_idle_secs: u64,
}

impl DashboardConfig {
    pub fn feed_session_idle(&self) -> Duration {
        Duration::from_secs(self.feed_session_idle_secs)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            feed_sample_size: default_sample_size(),
            top_users_limit: default_top_users_limit(),
            fetch_concurrency: default_fetch_concurrency(),
            engagement_seed: None,
            feed_session_idle_secs: default_feed_session_idle_secs(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            app: AppConfig {
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("APP_PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()
                    .context("Invalid APP_PORT")?,
                log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            social_api: SocialApiConfig {
                base_url: std::env::var("SOCIAL_API_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(|_| DEFAULT_SOCIAL_API_BASE_URL.to_string()),
                timeout_ms: env_or("SOCIAL_API_TIMEOUT_MS", default_timeout_ms())?,
            },
            cache: CacheConfig {
                users_ttl_secs: env_or("USERS_CACHE_TTL_SECS", default_users_ttl_secs())?,
                users_retries: env_or("USERS_CACHE_RETRIES", default_users_retries())?,
                users_retry_backoff_ms: env_or(
                    "USERS_CACHE_RETRY_BACKOFF_MS",
                    default_users_retry_backoff_ms(),
                )?,
            },
            dashboard: DashboardConfig {
                feed_sample_size: env_or("FEED_SAMPLE_SIZE", default_sample_size())?,
                top_users_limit: env_or("TOP_USERS_LIMIT", default_top_users_limit())?,
                fetch_concurrency: env_or("POST_FETCH_CONCURRENCY", default_fetch_concurrency())?
                    .max(1),
                engagement_seed: match std::env::var("ENGAGEMENT_SEED") {
                    Ok(seed) => Some(seed.parse().context("Invalid ENGAGEMENT_SEED")?),
                    Err(_) => None,
                },
                feed_session_idle_secs: env_or(
                    "FEED_SESSION_IDLE_SECS",
                    default_feed_session_idle_secs(),
                )?,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("Invalid {}={:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_UPSTREAM_DEADLINE.as_millis() as u64
}

fn default_users_ttl_secs() -> u64 {
    30
}

fn default_users_retries() -> u32 {
    1
}

fn default_users_retry_backoff_ms() -> u64 {
    1_000
}

fn default_sample_size() -> usize {
    5
}

fn default_top_users_limit() -> usize {
    5
}

fn default_fetch_concurrency() -> usize {
    1
}

fn default_feed_session_idle_secs() -> u64 {
    600
}
