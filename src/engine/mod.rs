//! Forecasting engine seam.
//!
//! The HTTP layer never talks to a concrete model directly; it hands a
//! chronological series to a [`Forecaster`] and gets back fitted values for
//! the historical dates plus `horizon` future rows, each with a point
//! estimate and an uncertainty interval. Keeping the engine behind this
//! trait lets tests substitute a scripted or failing engine.

mod seasonal_trend;

pub use seasonal_trend::SeasonalTrendForecaster;

use chrono::NaiveDate;
use thiserror::Error;

/// A single-variable daily time series in observation order.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl TimeSeries {
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Self {
        debug_assert_eq!(dates.len(), values.len());
        Self { dates, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

/// Engine output: one row per historical date followed by one row per
/// requested future period, in chronological order.
#[derive(Debug, Clone, Default)]
pub struct EngineForecast {
    pub dates: Vec<NaiveDate>,
    pub predicted: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl EngineForecast {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("series must contain at least {min} observations, got {got}")]
    TooFewObservations { min: usize, got: usize },

    #[error("non-finite value at position {0}")]
    NonFiniteValue(usize),

    #[error("model fit failed: {0}")]
    FitFailed(String),
}

/// Narrow interface to the forecasting model.
pub trait Forecaster: Send + Sync {
    /// Fit the model on `series` and produce fitted rows for every
    /// historical date plus `horizon` additional consecutive calendar days.
    fn fit_and_forecast(
        &self,
        series: &TimeSeries,
        horizon: u32,
    ) -> Result<EngineForecast, EngineError>;

    /// Short identifier used in logs.
    fn name(&self) -> &str;
}
