use axum::{Router, extract::DefaultBodyLimit};
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use tracing::info;

use crate::AppState;
use crate::api;
use crate::config::AppConfig;
use crate::llm::{LlmSettings, build_driver};

/// Build the router with all middleware applied.
pub fn build_app(state: AppState) -> Router {
    let body_limit = state.config.server.max_upload_bytes;

    api::router()
        .layer(DefaultBodyLimit::max(body_limit))
        // Browser clients call the API from another origin.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>, settings: LlmSettings) -> anyhow::Result<()> {
    info!(
        name: "llm.config.loaded",
        provider = settings.provider.display_name(),
        base_url = %settings.base_url,
        model = %settings.model,
        timeout_secs = settings.timeout.as_secs(),
        "LLM configuration loaded"
    );

    let driver = build_driver(settings);
    let state = AppState::new(Arc::clone(&config), driver)?;

    info!(
        name: "uploads.ready",
        dir = %state.scratch.root().display(),
        "Scratch directory ready"
    );

    let app = build_app(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
