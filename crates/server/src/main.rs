use std::{net::SocketAddr, sync::Arc};

use axum::{
    routing::{get, patch, post},
    Router,
};
use intake_core::{seed::sample_requests, IntakeSession};
use storage::{open_store, StorageLocation};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use app_state::AppState;
use config::load_settings;

const MAX_BODY_BYTES: usize = 64 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let location = StorageLocation::parse(&settings.storage_url);
    let store = open_store(&location).await.map_err(|error| {
        error!(
            storage_url = %settings.storage_url,
            error = ?error,
            "failed to open request store; verify the path and its permissions"
        );
        error
    })?;

    let mut session = IntakeSession::open(store).await;
    if settings.seed_sample_data {
        session.seed_if_empty(sample_requests()).await?;
    }

    let app = build_router(Arc::new(AppState::new(session, settings.export_prefix)));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(api::healthz))
        .route("/api/catalog", get(api::catalog))
        .route(
            "/api/requests",
            get(api::list_requests).post(api::submit_request),
        )
        .route("/api/requests/export", get(api::export_requests))
        .route("/api/requests/:id", patch(api::update_status))
        .route("/api/requests/:id/cancel", post(api::cancel_request))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
