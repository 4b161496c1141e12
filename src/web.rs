//! Server bootstrap: router assembly and serving.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::service::ForecastService;

/// Builds the full application router with its middleware stack.
pub fn app(service: Arc<ForecastService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api::router(service)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn run(service: Arc<ForecastService>, port: u16) -> Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("weatherservice running at http://localhost:{port}");
    axum::serve(listener, app(service))
        .await
        .context("Server error")?;
    Ok(())
}
