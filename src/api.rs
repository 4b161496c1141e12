//! HTTP surface: `/ping` and `/forecast/{city}`.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorBody, WeatherError};
use crate::service::{ForecastReport, ForecastRequest, ForecastService};

/// Service name reported by `/ping`.
pub const SERVICE_NAME: &str = "weatherservice";

#[derive(Clone)]
struct AppState {
    service: Arc<ForecastService>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PingResponse {
    pub name: String,
    pub status: String,
    pub version: String,
}

pub fn router(service: Arc<ForecastService>) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/forecast", get(missing_city))
        .route("/forecast/", get(missing_city))
        .route("/forecast/{city}", get(forecast))
        .with_state(AppState { service })
}

async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        name: SERVICE_NAME.to_string(),
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

async fn forecast(
    State(state): State<AppState>,
    Path(city): Path<String>,
    Query(request): Query<ForecastRequest>,
) -> Result<Json<ForecastReport>, WeatherError> {
    let report = state.service.forecast(&city, &request).await?;
    Ok(Json(report))
}

/// `/forecast` without a city segment is a client error with its own body,
/// distinct from the framework's bare 404.
async fn missing_city() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "no city provided".to_string(),
            error_code: "invalid request".to_string(),
        }),
    )
}
