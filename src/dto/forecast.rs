use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

/// Request body for `POST /predict`: a daily time series as parallel arrays
/// plus the number of future days to forecast.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[schema(example = json!({
    "timestamps": ["2024-01-01", "2024-01-02", "2024-01-03"],
    "values": [10.0, 12.0, 11.0],
    "forecast_days": 2
}))]
pub struct PredictRequest {
    /// Observation dates in `YYYY-MM-DD`, chronological order expected
    pub timestamps: Vec<String>,
    /// Observed values, parallel to `timestamps`
    pub values: Vec<f64>,
    /// Number of consecutive future days to forecast
    #[schema(minimum = 1)]
    pub forecast_days: u32,
}

/// One historical observation echoed back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoricalPointDto {
    /// Observation date, `YYYY-MM-DD`
    #[schema(example = "2024-01-01")]
    pub ds: String,
    /// Observed value
    pub y: f64,
}

/// One forecasted day with its uncertainty band.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ForecastPointDto {
    /// Forecast date, `YYYY-MM-DD`
    #[schema(example = "2024-01-04")]
    pub ds: String,
    /// Point forecast
    pub yhat: f64,
    /// Lower bound of the uncertainty band
    pub yhat_lower: f64,
    /// Upper bound of the uncertainty band
    pub yhat_upper: f64,
}

/// Response body for `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PredictResponse {
    /// Exactly `forecast_days` rows, consecutive days after the last input date
    pub forecast: Vec<ForecastPointDto>,
    /// The input series echoed back in order for client-side charting
    pub historical: Vec<HistoricalPointDto>,
}
