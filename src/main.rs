mod app;
mod body;
mod config;
mod error;
mod handlers;
mod middleware;
mod models;
mod server;
mod state;
mod telemetry;

use axum::{extract::Request, ServiceExt};

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = Config::from_env();
    let _guards = telemetry::init_tracing(
        "cnh-social-backend",
        config.log_dir.as_deref(),
        config.log_retention_days,
    );

    if config.wildcard_origin_with_credentials() {
        tracing::warn!(
            origins = ?config.cors_allowed_origins,
            "wildcard origin combined with credentials never matches a browser origin; \
             set CORS_ALLOWED_ORIGINS to explicit origins"
        );
    }

    let port = config.port;
    let app = app::build_router(AppState::new(config));
    let listener = server::bind_listener(port).await?;

    for line in server::startup_banner(handlers::SERVICE_NAME, port) {
        tracing::info!("{line}");
    }

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(server::shutdown_signal())
        .await
}
