use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::engine::EngineError;

/// Wire-level error body. The `detail` field name is part of the API
/// contract and carried by every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({ "detail": "timestamps and values must have the same length" }))]
pub struct ErrorBody {
    /// Human-readable error description
    #[schema(example = "timestamps and values must have the same length")]
    pub detail: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Forecast engine error: {0}")]
    EngineFailure(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<EngineError> for ServiceError {
    fn from(err: EngineError) -> Self {
        ServiceError::EngineFailure(err.to_string())
    }
}

impl ServiceError {
    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping:
    /// caller mistakes are 400, engine failures are 502.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::EngineFailure(_) => StatusCode::BAD_GATEWAY,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the message placed in the `detail` body field.
    /// Engine messages are surfaced verbatim; internal errors return a
    /// generic message to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::ValidationError(msg) | Self::EngineFailure(msg) => msg.clone(),
            Self::InternalError(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let body = ErrorBody {
            detail: self.response_message(),
        };
        (status, Json(body)).into_response()
    }
}
