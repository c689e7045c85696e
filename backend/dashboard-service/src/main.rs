use actix_web::{dev::Service, web, App, HttpServer};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dashboard_service::cache::UserDirectoryCache;
use dashboard_service::clients::{SocialApiClient, SocialDataSource};
use dashboard_service::config::Config;
use dashboard_service::handlers::{self, AppState};
use dashboard_service::metrics;
use dashboard_service::services::DashboardService;
use dashboard_service::state::FeedSessions;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_file(true)
                .with_target(true),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    info!("Starting dashboard-service v{}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.env);
    info!(
        "Configured log level: {} (RUST_LOG takes precedence)",
        config.app.log_level
    );

    let client =
        SocialApiClient::new(&config.social_api).context("Failed to build social API client")?;
    info!(
        base_url = %client.base_url(),
        timeout_ms = config.social_api.timeout_ms,
        "Social API configured"
    );
    let source: Arc<dyn SocialDataSource> = Arc::new(client);

    let users = UserDirectoryCache::new(source, &config.cache);
    let dashboard = DashboardService::new(users, config.dashboard.clone());
    let sessions = FeedSessions::new(config.dashboard.feed_session_idle());
    let state = web::Data::new(AppState::new(dashboard, sessions));

    if config.dashboard.engagement_seed.is_some() {
        info!("Engagement numbers use a fixed seed");
    }

    let bind_address = config.bind_address();
    info!("HTTP server listening on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(TracingLogger::default())
            .route("/metrics", web::get().to(metrics::serve_metrics))
            .wrap_fn(|req, srv| {
                let method = req.method().to_string();
                let path = metrics::route_label(&req);
                let start = Instant::now();

                let fut = srv.call(req);
                async move {
                    match fut.await {
                        Ok(res) => {
                            metrics::observe_http_request(
                                &method,
                                &path,
                                res.status().as_u16(),
                                start.elapsed(),
                            );
                            Ok(res)
                        }
                        Err(err) => {
                            metrics::observe_http_request(&method, &path, 500, start.elapsed());
                            Err(err)
                        }
                    }
                }
            })
            .configure(handlers::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind HTTP server to {}", bind_address))?
    .run()
    .await
    .context("HTTP server error")
}
