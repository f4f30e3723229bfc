//! Wire-level request and response types.

pub mod forecast;

pub use forecast::{ForecastPointDto, HistoricalPointDto, PredictRequest, PredictResponse};
