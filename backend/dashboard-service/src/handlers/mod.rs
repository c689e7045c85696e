pub mod api;
pub mod health;
pub mod pages;

use actix_web::cookie::{Cookie, SameSite};
use actix_web::{web, HttpRequest};
use uuid::Uuid;

use crate::services::DashboardService;
use crate::state::FeedSessions;

pub use api::{api_feed, api_top_users, api_trending};
pub use health::{health_check, liveness, readiness};
pub use pages::{feed, refresh_feed, top_users, trending};

pub const FEED_SESSION_COOKIE: &str = "feed_session";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub dashboard: DashboardService,
    pub sessions: FeedSessions,
}

impl AppState {
    pub fn new(dashboard: DashboardService, sessions: FeedSessions) -> Self {
        Self {
            dashboard,
            sessions,
        }
    }

    /// Drop the visitor's feed session, if any; called on every page change
    pub async fn leave_feed(&self, req: &HttpRequest) {
        if let Some(id) = feed_session_id(req) {
            self.sessions.discard(&id).await;
        }
    }
}

pub fn feed_session_id(req: &HttpRequest) -> Option<Uuid> {
    req.cookie(FEED_SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
}

pub fn feed_session_cookie(id: Uuid) -> Cookie<'static> {
    Cookie::build(FEED_SESSION_COOKIE, id.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

/// Register every dashboard route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(feed)
        .service(refresh_feed)
        .service(top_users)
        .service(trending)
        .service(
            web::scope("/api/v1")
                .service(api_feed)
                .service(api_top_users)
                .service(api_trending)
                .service(liveness)
                .service(readiness),
        )
        .service(health_check);
}
