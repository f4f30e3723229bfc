pub mod forecast;
pub mod status;

use axum::Router;

use crate::AppState;

/// Build the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(status::status_routes())
        .merge(forecast::forecast_routes())
}
