//! Forecast API Library
//!
//! This crate provides the core functionality for the forecast API: request
//! validation, shaping of time series into the forecasting engine's input,
//! and shaping of the engine's output into the stable wire contract.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod dto;
pub mod engine;
pub mod errors;
pub mod extract;
pub mod handlers;
pub mod middleware_helpers;
pub mod openapi;
pub mod services;
pub mod tracing;

use std::sync::Arc;

use axum::Router;
use tower_http::compression::CompressionLayer;

use crate::engine::Forecaster;

// App state definition. Built once at startup and never mutated afterwards;
// the forecasting engine sits behind a trait so tests can swap it out.
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub forecaster: Arc<dyn Forecaster>,
}

impl AppState {
    pub fn forecast_service(&self) -> services::forecast::ForecastService {
        services::forecast::ForecastService::new(
            self.forecaster.clone(),
            self.config.max_forecast_days,
        )
    }
}

/// Build the application router: API routes + Swagger UI + the shared
/// middleware stack (request ids, HTTP tracing, compression).
///
/// CORS is layered on separately by the binary because its construction
/// depends on environment-specific configuration and may refuse to start.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(handlers::routes())
        .merge(openapi::swagger_ui())
        .layer(tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}
