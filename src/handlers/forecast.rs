use axum::{extract::State, response::Json, routing::post, Router};

use crate::{
    dto::{PredictRequest, PredictResponse},
    errors::ServiceError,
    extract::ApiJson,
    AppState,
};

pub fn forecast_routes() -> Router<AppState> {
    Router::new().route("/predict", post(predict))
}

/// Forecasting endpoint: fit the engine on the submitted series and return
/// `forecast_days` future points with uncertainty bands, plus the input
/// echoed back.
///
/// The engine call is synchronous CPU-bound work; for the series sizes this
/// endpoint accepts it completes well under a scheduler tick.
#[utoipa::path(
    post,
    path = "/predict",
    request_body = PredictRequest,
    responses(
        (status = 200, description = "Forecast produced", body = PredictResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorBody),
        (status = 502, description = "Forecasting engine failed", body = crate::errors::ErrorBody)
    ),
    tag = "Forecast"
)]
pub async fn predict(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<PredictRequest>,
) -> Result<Json<PredictResponse>, ServiceError> {
    let service = state.forecast_service();
    let response = service.predict(&payload)?;
    Ok(Json(response))
}
