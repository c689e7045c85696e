//! HTML page handlers
//!
//! Opening another page discards the visitor's feed session, which abandons
//! whatever was still being computed for it. `/` shows the live session when
//! there is one, otherwise it starts a new session and computes its first
//! batch. `/feed/refresh` merges another batch into the current session and
//! redirects back to `/`.

use actix_web::http::header;
use actix_web::http::StatusCode;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

use super::{feed_session_cookie, feed_session_id, AppState};
use crate::error::Result;
use crate::services::RefreshOutcome;
use crate::state::{abandon_pair, FeedSession, ViewPhase};
use crate::views;

fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn page_status(phase: ViewPhase) -> StatusCode {
    if phase == ViewPhase::Failed {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}

fn see_feed() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

async fn render_feed(state: &AppState, session: &FeedSession) -> HttpResponse {
    let snapshot = session.snapshot().await;
    let mut rng = state.dashboard.seed().card_rng();
    let body = views::feed_page(&snapshot, Utc::now().timestamp_millis(), &mut rng);

    HttpResponse::build(page_status(snapshot.phase))
        .content_type("text/html; charset=utf-8")
        .cookie(feed_session_cookie(snapshot.id))
        .body(body)
}

/// GET /
#[get("/")]
pub async fn feed(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    if let Some(session) = current_session(&req, &state).await {
        // A failed load is retried by reloading the page
        if session.snapshot().await.phase != ViewPhase::Failed {
            return Ok(render_feed(&state, &session).await);
        }
        state.sessions.discard(&session.id()).await;
    }

    let session = state.sessions.open().await;
    let outcome = state.dashboard.refresh_feed(&session).await?;
    debug!(session_id = %session.id(), ?outcome, "Initial feed computed");

    Ok(render_feed(&state, &session).await)
}

/// POST /feed/refresh
#[post("/feed/refresh")]
pub async fn refresh_feed(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    // Expired or unknown session: `/` starts over
    let Some(session) = current_session(&req, &state).await else {
        return Ok(see_feed());
    };

    match state.dashboard.refresh_feed(&session).await? {
        RefreshOutcome::InProgress => {
            debug!(session_id = %session.id(), "Refresh requested while one is running")
        }
        outcome => debug!(session_id = %session.id(), ?outcome, "Feed refresh finished"),
    }

    Ok(see_feed())
}

async fn current_session(req: &HttpRequest, state: &AppState) -> Option<Arc<FeedSession>> {
    match feed_session_id(req) {
        Some(id) => state.sessions.get(&id).await,
        None => None,
    }
}

/// GET /top-users
#[get("/top-users")]
pub async fn top_users(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    state.leave_feed(&req).await;

    let (_abandon, signal) = abandon_pair();
    let model = state.dashboard.top_users(signal).await?;

    Ok(html(page_status(model.phase()), views::top_users_page(&model)))
}

/// GET /trending
#[get("/trending")]
pub async fn trending(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    state.leave_feed(&req).await;

    let (_abandon, signal) = abandon_pair();
    let model = state.dashboard.trending(signal).await?;
    let mut rng = state.dashboard.seed().card_rng();

    Ok(html(
        page_status(model.phase()),
        views::trending_page(&model, &mut rng),
    ))
}
