use actix_web::{get, web, HttpResponse};
use serde_json::json;

use super::AppState;

/// GET /health
#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

/// GET /api/v1/health/live
#[get("/health/live")]
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

/// GET /api/v1/health/ready
///
/// Ready once a user list (remote or fallback) can be produced.
#[get("/health/ready")]
pub async fn readiness(state: web::Data<AppState>) -> HttpResponse {
    if state.dashboard.users_ready().await {
        HttpResponse::Ok().json(json!({ "status": "ready" }))
    } else {
        HttpResponse::ServiceUnavailable().json(json!({ "status": "not_ready" }))
    }
}
