//! JSON mirrors of the dashboard pages

use actix_web::{get, web, HttpResponse};

use super::AppState;
use crate::error::{AppError, Result};
use crate::models::{FeedResponse, TopUsersResponse, TrendingResponse};
use crate::services::RefreshOutcome;
use crate::state::{abandon_pair, FeedSession, ViewModel, ViewPhase};

/// Data of a finished model, or the user-list failure it ended in
fn ready_data<T: Default>(mut model: ViewModel<T>) -> Result<T> {
    match model.phase() {
        ViewPhase::Failed => Err(AppError::UsersUnavailable(
            model.failure().unwrap_or("unknown").to_string(),
        )),
        _ => Ok(model.take_data().unwrap_or_default()),
    }
}

/// GET /api/v1/top-users
#[get("/top-users")]
pub async fn api_top_users(state: web::Data<AppState>) -> Result<HttpResponse> {
    let (_abandon, signal) = abandon_pair();
    let users = ready_data(state.dashboard.top_users(signal).await?)?;

    Ok(HttpResponse::Ok().json(TopUsersResponse {
        count: users.len(),
        users,
    }))
}

/// GET /api/v1/trending
#[get("/trending")]
pub async fn api_trending(state: web::Data<AppState>) -> Result<HttpResponse> {
    let (_abandon, signal) = abandon_pair();
    let posts = ready_data(state.dashboard.trending(signal).await?)?;

    Ok(HttpResponse::Ok().json(TrendingResponse {
        count: posts.len(),
        max_comments: posts.first().map(|p| p.comment_count),
        posts,
    }))
}

/// GET /api/v1/feed
///
/// One freshly sampled batch; nothing is kept between calls.
#[get("/feed")]
pub async fn api_feed(state: web::Data<AppState>) -> Result<HttpResponse> {
    let session = FeedSession::new();

    let sampled_user_ids = match state.dashboard.refresh_feed(&session).await? {
        RefreshOutcome::Completed {
            sampled_user_ids, ..
        } => sampled_user_ids,
        RefreshOutcome::Failed => {
            let snapshot = session.snapshot().await;
            return Err(AppError::UsersUnavailable(
                snapshot.failure.unwrap_or_else(|| "unknown".to_string()),
            ));
        }
        RefreshOutcome::InProgress => {
            return Err(AppError::Internal("fresh feed session already refreshing".into()))
        }
    };

    let items = session.snapshot().await.items;
    Ok(HttpResponse::Ok().json(FeedResponse {
        count: items.len(),
        items,
        sampled_user_ids,
    }))
}
