//! Prometheus metrics for dashboard-service

use std::time::Duration;

use actix_web::dev::ServiceRequest;
use actix_web::HttpResponse;
use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "dashboard_service_http_requests_total",
        "Total HTTP requests handled by dashboard-service",
        &["method", "path", "status"]
    )
    .expect("failed to register dashboard_service_http_requests_total")
});

static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "dashboard_service_http_request_duration_seconds",
        "HTTP request latency for dashboard-service",
        &["method", "path", "status"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("failed to register dashboard_service_http_request_duration_seconds")
});

static UPSTREAM_CALLS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "dashboard_upstream_calls_total",
        "Calls to the social API by endpoint and outcome",
        &["endpoint", "outcome"]
    )
    .expect("failed to register dashboard_upstream_calls_total")
});

static FALLBACKS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "dashboard_fallbacks_total",
        "Times sample data was served instead of social API data",
        &["endpoint"]
    )
    .expect("failed to register dashboard_fallbacks_total")
});

/// Path label for requests that matched no route, so unknown URLs share one series
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Route pattern of the request, e.g. `/top-users`
pub fn route_label(req: &ServiceRequest) -> String {
    req.match_pattern()
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

pub fn observe_http_request(method: &str, path: &str, status: u16, elapsed: Duration) {
    let status_label = status.to_string();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status_label])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path, &status_label])
        .observe(elapsed.as_secs_f64());
}

pub fn record_upstream_call(endpoint: &str, success: bool) {
    let outcome = if success { "success" } else { "error" };
    UPSTREAM_CALLS_TOTAL
        .with_label_values(&[endpoint, outcome])
        .inc();
}

pub fn record_fallback(endpoint: &str) {
    FALLBACKS_TOTAL.with_label_values(&[endpoint]).inc();
}

pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
