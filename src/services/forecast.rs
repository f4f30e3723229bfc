use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::{
    dto::{ForecastPointDto, HistoricalPointDto, PredictRequest, PredictResponse},
    engine::{Forecaster, TimeSeries},
    errors::ServiceError,
};

/// Date format shared by input parsing and output serialization.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stateless service turning a predict request into a forecast response.
/// Owns no data beyond the injected engine; every call is independent.
#[derive(Clone)]
pub struct ForecastService {
    forecaster: Arc<dyn Forecaster>,
    max_forecast_days: u32,
}

impl ForecastService {
    pub fn new(forecaster: Arc<dyn Forecaster>, max_forecast_days: u32) -> Self {
        Self {
            forecaster,
            max_forecast_days,
        }
    }

    /// Validate the request, hand the series to the engine, and reshape the
    /// engine output into the wire contract. The engine returns fitted rows
    /// for the historical dates too; only the last `forecast_days` rows are
    /// kept while the input series is echoed back verbatim.
    pub fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, ServiceError> {
        let series = self.validate(request)?;
        info!(
            points = series.len(),
            horizon = request.forecast_days,
            engine = self.forecaster.name(),
            "forecast requested"
        );
        debug!(
            first = %series.dates[0],
            last = %series.dates[series.len() - 1],
            "series range"
        );

        let engine_out = self
            .forecaster
            .fit_and_forecast(&series, request.forecast_days)?;

        let horizon = request.forecast_days as usize;
        if engine_out.len() < horizon {
            return Err(ServiceError::InternalError(format!(
                "engine returned {} rows for a horizon of {}",
                engine_out.len(),
                horizon
            )));
        }

        // The engine also produces fitted values for historical dates;
        // the forecast portion is the trailing `horizon` rows.
        let offset = engine_out.len() - horizon;
        let forecast = (offset..engine_out.len())
            .map(|i| ForecastPointDto {
                ds: engine_out.dates[i].format(DATE_FORMAT).to_string(),
                yhat: engine_out.predicted[i],
                yhat_lower: engine_out.lower[i],
                yhat_upper: engine_out.upper[i],
            })
            .collect();

        let historical = series
            .dates
            .iter()
            .zip(series.values.iter())
            .map(|(date, &value)| HistoricalPointDto {
                ds: date.format(DATE_FORMAT).to_string(),
                y: value,
            })
            .collect();

        debug!(forecast_rows = horizon, "forecast produced");
        Ok(PredictResponse {
            forecast,
            historical,
        })
    }

    /// Check the request invariants and build the internal series.
    fn validate(&self, request: &PredictRequest) -> Result<TimeSeries, ServiceError> {
        if request.timestamps.is_empty() {
            return Err(ServiceError::ValidationError(
                "timestamps must not be empty".to_string(),
            ));
        }
        if request.timestamps.len() != request.values.len() {
            return Err(ServiceError::ValidationError(format!(
                "timestamps and values must have the same length ({} != {})",
                request.timestamps.len(),
                request.values.len()
            )));
        }
        if request.timestamps.len() < 2 {
            return Err(ServiceError::ValidationError(
                "at least 2 observations are required to fit a trend".to_string(),
            ));
        }
        if request.forecast_days < 1 {
            return Err(ServiceError::ValidationError(
                "forecast_days must be at least 1".to_string(),
            ));
        }
        if request.forecast_days > self.max_forecast_days {
            return Err(ServiceError::ValidationError(format!(
                "forecast_days must be at most {}",
                self.max_forecast_days
            )));
        }

        let mut dates = Vec::with_capacity(request.timestamps.len());
        for (i, raw) in request.timestamps.iter().enumerate() {
            let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
                ServiceError::ValidationError(format!(
                    "timestamp '{}' at position {} is not a valid YYYY-MM-DD date",
                    raw, i
                ))
            })?;
            dates.push(date);
        }
        if let Some(pos) = request.values.iter().position(|v| !v.is_finite()) {
            return Err(ServiceError::ValidationError(format!(
                "value at position {} is not a finite number",
                pos
            )));
        }

        // Dates are passed through in the order given; ordering problems are
        // flagged for the operator but the series is not resorted.
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            warn!("input dates are not strictly increasing; forecasting on the series as given");
        }

        Ok(TimeSeries::new(dates, request.values.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineError, EngineForecast};
    use assert_matches::assert_matches;
    use chrono::Duration;

    /// Scripted engine used to exercise the shaping logic in isolation.
    struct StubEngine;

    impl Forecaster for StubEngine {
        fn fit_and_forecast(
            &self,
            series: &TimeSeries,
            horizon: u32,
        ) -> Result<EngineForecast, EngineError> {
            let last = series.last_date().unwrap();
            let mut out = EngineForecast::default();
            // Fitted rows for history, marker values so tests can tell
            // historical fit (1000+) from future rows (2000+).
            for (i, &d) in series.dates.iter().enumerate() {
                out.dates.push(d);
                out.predicted.push(1000.0 + i as f64);
                out.lower.push(999.0);
                out.upper.push(1001.0 + i as f64);
            }
            for h in 1..=horizon as i64 {
                out.dates.push(last + Duration::days(h));
                out.predicted.push(2000.0 + h as f64);
                out.lower.push(1999.0);
                out.upper.push(2001.0 + h as f64);
            }
            Ok(out)
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct FailingEngine;

    impl Forecaster for FailingEngine {
        fn fit_and_forecast(
            &self,
            _series: &TimeSeries,
            _horizon: u32,
        ) -> Result<EngineForecast, EngineError> {
            Err(EngineError::FitFailed("optimizer diverged".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn service() -> ForecastService {
        ForecastService::new(Arc::new(StubEngine), 365)
    }

    fn request(timestamps: &[&str], values: &[f64], forecast_days: u32) -> PredictRequest {
        PredictRequest {
            timestamps: timestamps.iter().map(|s| s.to_string()).collect(),
            values: values.to_vec(),
            forecast_days,
        }
    }

    #[test]
    fn forecast_keeps_only_the_trailing_horizon_rows() {
        let req = request(
            &["2024-01-01", "2024-01-02", "2024-01-03"],
            &[10.0, 12.0, 11.0],
            2,
        );
        let resp = service().predict(&req).unwrap();

        assert_eq!(resp.forecast.len(), 2);
        // Historical fitted rows from the engine (1000+) must be discarded.
        assert_eq!(resp.forecast[0].yhat, 2001.0);
        assert_eq!(resp.forecast[0].ds, "2024-01-04");
        assert_eq!(resp.forecast[1].ds, "2024-01-05");
    }

    #[test]
    fn historical_series_is_echoed_exactly() {
        let req = request(
            &["2024-01-01", "2024-01-02", "2024-01-03"],
            &[10.0, 12.0, 11.0],
            2,
        );
        let resp = service().predict(&req).unwrap();

        assert_eq!(resp.historical.len(), 3);
        for (point, (ts, value)) in resp
            .historical
            .iter()
            .zip(req.timestamps.iter().zip(req.values.iter()))
        {
            assert_eq!(&point.ds, ts);
            assert_eq!(point.y, *value);
        }
    }

    #[test]
    fn empty_timestamps_are_rejected() {
        let err = service().predict(&request(&[], &[], 2)).unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(msg) if msg.contains("empty"));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let req = request(&["2024-01-01", "2024-01-02"], &[1.0], 2);
        let err = service().predict(&req).unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(msg) if msg.contains("same length"));
    }

    #[test]
    fn single_observation_is_rejected() {
        let req = request(&["2024-01-01"], &[1.0], 2);
        let err = service().predict(&req).unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(msg) if msg.contains("at least 2"));
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let req = request(&["2024-01-01", "2024-01-02"], &[1.0, 2.0], 0);
        let err = service().predict(&req).unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(msg) if msg.contains("at least 1"));
    }

    #[test]
    fn horizon_above_the_cap_is_rejected() {
        let req = request(&["2024-01-01", "2024-01-02"], &[1.0, 2.0], 366);
        let err = service().predict(&req).unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(msg) if msg.contains("at most 365"));
    }

    #[test]
    fn malformed_date_is_rejected_with_position() {
        let req = request(&["2024-01-01", "01/02/2024"], &[1.0, 2.0], 2);
        let err = service().predict(&req).unwrap_err();
        assert_matches!(
            err,
            ServiceError::ValidationError(msg) if msg.contains("01/02/2024") && msg.contains("position 1")
        );
    }

    #[test]
    fn non_finite_value_is_rejected() {
        let req = request(&["2024-01-01", "2024-01-02"], &[1.0, f64::INFINITY], 2);
        let err = service().predict(&req).unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(msg) if msg.contains("finite"));
    }

    #[test]
    fn engine_failure_surfaces_verbatim() {
        let svc = ForecastService::new(Arc::new(FailingEngine), 365);
        let req = request(&["2024-01-01", "2024-01-02"], &[1.0, 2.0], 2);
        let err = svc.predict(&req).unwrap_err();
        assert_matches!(err, ServiceError::EngineFailure(msg) if msg.contains("optimizer diverged"));
    }
}
