//! HTTP surface for the curation service
//!
//! Exposes feedback ingestion and the read-only analytics views to the
//! extension's background process over localhost.

pub mod http;

use std::sync::Arc;

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::service::CurationService;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct ServerState {
    pub service: Arc<CurationService>,
}

/// Build the application router
pub fn router(service: Arc<CurationService>) -> Router {
    let state = ServerState { service };
    Router::new()
        .route("/status", get(http::status_handler))
        .route("/feedback", post(http::submit_feedback_handler))
        .route("/golden-set", get(http::golden_set_handler))
        .route("/stats", get(http::stats_handler))
        .route("/export", get(http::export_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until shutdown
pub async fn start(service: Arc<CurationService>, config: &ServerConfig) -> Result<()> {
    let app = router(service);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Curation service listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
