use axum::{response::Json, routing::get, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::AppState;

/// Fixed payload returned by the health check.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    #[schema(example = "API is running")]
    pub status: String,
}

pub fn status_routes() -> Router<AppState> {
    Router::new().route("/status", get(health_check))
}

/// Health check endpoint. Always returns 200 with a fixed payload,
/// independent of any prior forecasting activity.
#[utoipa::path(
    get,
    path = "/status",
    responses(
        (status = 200, description = "Service is up", body = StatusResponse)
    ),
    tag = "Status"
)]
pub async fn health_check() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "API is running".to_string(),
    })
}
