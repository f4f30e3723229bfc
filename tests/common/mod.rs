use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, Response, StatusCode},
    Router,
};
use forecast_api::{
    app,
    config::AppConfig,
    engine::{EngineError, EngineForecast, Forecaster, SeasonalTrendForecaster, TimeSeries},
    AppState,
};
use serde_json::Value;
use tower::ServiceExt;

/// Helper harness wrapping the real application router.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    /// Application with the production engine and default configuration.
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        let forecaster = Arc::new(SeasonalTrendForecaster::new(
            cfg.seasonal_period,
            cfg.confidence_level,
        ));
        Self::with_state(AppState {
            config: cfg,
            forecaster,
        })
    }

    /// Application with a substitute engine, for exercising failure paths.
    pub fn with_forecaster(forecaster: Arc<dyn Forecaster>) -> Self {
        Self::with_state(AppState {
            config: AppConfig::default(),
            forecaster,
        })
    }

    fn with_state(state: AppState) -> Self {
        Self { router: app(state) }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        let request = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            builder.body(Body::from(json.to_string())).unwrap()
        } else {
            builder.body(Body::empty()).unwrap()
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Issue a request with an arbitrary raw body sent as JSON and decode
    /// the response body.
    pub async fn request_raw_json(
        &self,
        method: Method,
        uri: &str,
        body: &str,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::Null);
        (status, json)
    }

    /// Issue a request and decode the JSON body.
    pub async fn request_json(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::Null);
        (status, json)
    }
}

/// Engine that always fails, for testing the 502 path.
pub struct FailingForecaster {
    pub message: &'static str,
}

impl Forecaster for FailingForecaster {
    fn fit_and_forecast(
        &self,
        _series: &TimeSeries,
        _horizon: u32,
    ) -> Result<EngineForecast, EngineError> {
        Err(EngineError::FitFailed(self.message.to_string()))
    }

    fn name(&self) -> &str {
        "always-failing"
    }
}
