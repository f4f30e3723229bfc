//! Trend + seasonality forecaster.
//!
//! Fits an ordinary least-squares linear trend over the observation index,
//! overlays an additive seasonal profile estimated from detrended values,
//! and derives prediction intervals from in-sample residuals, widening with
//! lead time.

use chrono::Duration;

use super::{EngineError, EngineForecast, Forecaster, TimeSeries};

/// Deterministic forecasting engine: linear trend + additive seasonal
/// component + residual-based prediction intervals.
#[derive(Debug, Clone)]
pub struct SeasonalTrendForecaster {
    seasonal_period: usize,
    confidence_level: f64,
}

impl SeasonalTrendForecaster {
    pub fn new(seasonal_period: usize, confidence_level: f64) -> Self {
        Self {
            seasonal_period,
            confidence_level,
        }
    }
}

impl Default for SeasonalTrendForecaster {
    fn default() -> Self {
        // Weekly cycle on daily data, 95% bands.
        Self::new(7, 0.95)
    }
}

impl Forecaster for SeasonalTrendForecaster {
    fn fit_and_forecast(
        &self,
        series: &TimeSeries,
        horizon: u32,
    ) -> Result<EngineForecast, EngineError> {
        let n = series.len();
        if n < 2 {
            return Err(EngineError::TooFewObservations { min: 2, got: n });
        }
        if let Some(pos) = series.values.iter().position(|v| !v.is_finite()) {
            return Err(EngineError::NonFiniteValue(pos));
        }

        let (slope, intercept) = fit_trend(&series.values);
        if !slope.is_finite() || !intercept.is_finite() {
            return Err(EngineError::FitFailed(
                "trend coefficients are not finite".to_string(),
            ));
        }
        let trend = |t: usize| intercept + slope * t as f64;

        let profile = seasonal_profile(&series.values, slope, intercept, self.seasonal_period);
        let seasonal = |t: usize| profile[t % profile.len()];

        let fitted: Vec<f64> = (0..n).map(|t| trend(t) + seasonal(t)).collect();
        let sigma = residual_std_dev(&series.values, &fitted);
        let z = z_score(self.confidence_level);

        let last_date = series
            .last_date()
            .ok_or_else(|| EngineError::FitFailed("series has no dates".to_string()))?;

        let total = n + horizon as usize;
        let mut out = EngineForecast {
            dates: Vec::with_capacity(total),
            predicted: Vec::with_capacity(total),
            lower: Vec::with_capacity(total),
            upper: Vec::with_capacity(total),
        };

        // Historical rows carry the in-sample fit with a flat band.
        for (t, &date) in series.dates.iter().enumerate() {
            let yhat = fitted[t];
            out.dates.push(date);
            out.predicted.push(yhat);
            out.lower.push(yhat - z * sigma);
            out.upper.push(yhat + z * sigma);
        }

        // Future rows continue the trend and cycle; the standard error
        // grows with sqrt of the lead time.
        for h in 1..=horizon as usize {
            let t = n - 1 + h;
            let yhat = trend(t) + seasonal(t);
            let se = sigma * (h as f64).sqrt();
            out.dates.push(last_date + Duration::days(h as i64));
            out.predicted.push(yhat);
            out.lower.push(yhat - z * se);
            out.upper.push(yhat + z * se);
        }

        Ok(out)
    }

    fn name(&self) -> &str {
        "seasonal-trend"
    }
}

/// Least-squares line over the observation index. Returns (slope, intercept).
fn fit_trend(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let t_mean = (n - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var = 0.0;
    for (t, &y) in values.iter().enumerate() {
        let dt = t as f64 - t_mean;
        cov += dt * (y - y_mean);
        var += dt * dt;
    }
    if var == 0.0 {
        return (0.0, y_mean);
    }
    let slope = cov / var;
    (slope, y_mean - slope * t_mean)
}

/// Average detrended value per cycle position, centered so the trend keeps
/// the level. Falls back to a flat profile when the series is shorter than
/// two full cycles.
fn seasonal_profile(values: &[f64], slope: f64, intercept: f64, period: usize) -> Vec<f64> {
    let n = values.len();
    if period < 2 || n < period * 2 {
        return vec![0.0; period.max(1)];
    }

    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (t, &y) in values.iter().enumerate() {
        let detrended = y - (intercept + slope * t as f64);
        sums[t % period] += detrended;
        counts[t % period] += 1;
    }

    let mut profile: Vec<f64> = sums
        .iter()
        .zip(counts.iter())
        .map(|(&s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
        .collect();

    let mean = profile.iter().sum::<f64>() / period as f64;
    for p in &mut profile {
        *p -= mean;
    }
    profile
}

fn residual_std_dev(values: &[f64], fitted: &[f64]) -> f64 {
    let n = values.len() as f64;
    let variance = values
        .iter()
        .zip(fitted.iter())
        .map(|(y, f)| (y - f).powi(2))
        .sum::<f64>()
        / n;
    variance.sqrt()
}

/// Z-score for common confidence levels (approximate).
fn z_score(confidence_level: f64) -> f64 {
    match confidence_level {
        x if x >= 0.99 => 2.576,
        x if x >= 0.95 => 1.96,
        x if x >= 0.90 => 1.645,
        x if x >= 0.80 => 1.282,
        _ => 1.96,
    }
}
