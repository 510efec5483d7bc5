//! Linear trend forecasts and goal probability.
//!
//! A forecast fits OLS against index position over the metric's recent
//! archived values and extrapolates. Confidence starts from how much history
//! backs the fit and decays with distance from the last observation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::logging::{event_names, Stage};
use crate::store::TimeSeriesStore;
use vt_common::{Error, Metric, Result};
use vt_config::tunables::ForecastParams;
use vt_math::{clamp_score, ols_indexed, LinearFit};

/// Direction of a metric's fitted trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

impl Trend {
    pub fn from_slope(slope: f64, threshold: f64) -> Self {
        if slope > threshold {
            Trend::Improving
        } else if slope < -threshold {
            Trend::Declining
        } else {
            Trend::Stable
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Improving => write!(f, "improving"),
            Trend::Declining => write!(f, "declining"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    /// Days after the last observation, starting at 1.
    pub day_offset: usize,
    pub predicted_value: f64,
    pub confidence_percent: u8,
}

/// Fitted trend for one metric. Points are produced lazily by
/// [`points`](Self::points) and can be walked any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricForecast {
    pub metric: Metric,
    pub fit: LinearFit,
    pub trend: Trend,
    pub horizon: usize,
    last_index: usize,
    decay_days: f64,
    full_confidence_points: usize,
}

impl MetricForecast {
    pub fn data_points(&self) -> usize {
        self.fit.n
    }

    /// Confidence before distance decay, in percent.
    pub fn base_confidence(&self) -> f64 {
        let full = self.full_confidence_points.max(1) as f64;
        (self.fit.n as f64 / full * 100.0).min(100.0)
    }

    /// Forecast point `day_offset` days past the last observation.
    pub fn point(&self, day_offset: usize) -> ForecastPoint {
        let x = (self.last_index + day_offset) as f64;
        let decay = (-(day_offset as f64) / self.decay_days).exp();
        let confidence = (self.base_confidence() * decay).round().clamp(0.0, 100.0);
        ForecastPoint {
            day_offset,
            predicted_value: clamp_score(self.fit.predict(x)),
            confidence_percent: confidence as u8,
        }
    }

    pub fn points(&self) -> ForecastPoints<'_> {
        ForecastPoints {
            forecast: self,
            next: 1,
        }
    }

    pub fn to_report(&self) -> ForecastReport {
        ForecastReport {
            metric: self.metric,
            trend: self.trend,
            slope: self.fit.slope,
            intercept: self.fit.intercept,
            r_squared: self.fit.r_squared,
            data_points: self.fit.n,
            points: self.points().collect(),
        }
    }
}

/// Iterator over the points of a [`MetricForecast`].
#[derive(Debug, Clone)]
pub struct ForecastPoints<'a> {
    forecast: &'a MetricForecast,
    next: usize,
}

impl Iterator for ForecastPoints<'_> {
    type Item = ForecastPoint;

    fn next(&mut self) -> Option<ForecastPoint> {
        if self.next > self.forecast.horizon {
            return None;
        }
        let point = self.forecast.point(self.next);
        self.next += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.forecast.horizon + 1).saturating_sub(self.next);
        (left, Some(left))
    }
}

impl ExactSizeIterator for ForecastPoints<'_> {}

/// Serializable forecast with its points materialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    pub metric: Metric,
    pub trend: Trend,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub data_points: usize,
    pub points: Vec<ForecastPoint>,
}

/// Fit a trend to a metric's values, oldest first.
pub fn forecast_from_values(
    metric: Metric,
    values: &[f64],
    horizon: usize,
    params: &ForecastParams,
) -> Result<MetricForecast> {
    if values.len() < params.min_points {
        debug!(
            event = event_names::FORECAST_INSUFFICIENT,
            stage = %Stage::Forecast,
            %metric,
            points = values.len(),
            required = params.min_points,
            "not enough history to forecast"
        );
        return Err(Error::insufficient("forecast", params.min_points, values.len()));
    }
    let fit = ols_indexed(values)
        .ok_or_else(|| Error::insufficient("forecast", params.min_points, values.len()))?;
    Ok(MetricForecast {
        metric,
        fit,
        trend: Trend::from_slope(fit.slope, params.trend_threshold),
        horizon,
        last_index: values.len() - 1,
        decay_days: params.confidence_decay_days,
        full_confidence_points: params.full_confidence_points,
    })
}

/// Forecast `metric` over `horizon` days from the forecast window.
pub fn forecast_metric(
    store: &TimeSeriesStore,
    metric: Metric,
    horizon: usize,
    params: &ForecastParams,
) -> Result<MetricForecast> {
    let values: Vec<f64> = store
        .read_metric(metric, params.window_days)
        .into_iter()
        .map(|p| p.value)
        .collect();
    forecast_from_values(metric, &values, horizon, params)
}

/// Likelihood of reaching a target on the current trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProbability {
    pub metric: Metric,
    pub current: f64,
    pub target: f64,
    pub days_to_goal: u32,
    pub current_slope: f64,
    pub required_slope: f64,
    /// Value reached in `days_to_goal` days at the current slope.
    pub projected: f64,
    /// Percent in `[0, 100]`.
    pub probability: f64,
}

/// Closeness of the current slope to the required one, as a percent.
///
/// The gap is scaled by `max(|required|, 1)`, so small required slopes are
/// judged on an absolute rather than relative scale.
pub fn goal_probability(current: f64, slope: f64, target: f64, days_to_goal: u32) -> Result<f64> {
    if days_to_goal == 0 {
        return Err(Error::invalid("daysToGoal", "must be at least 1"));
    }
    let required = (target - current) / f64::from(days_to_goal);
    let gap = (required - slope).abs() / required.abs().max(1.0);
    Ok((100.0 * (1.0 - gap)).clamp(0.0, 100.0))
}

/// Probability of `metric` reaching `target` within `days_to_goal` days.
///
/// `current` is the latest archived value; the slope comes from the same
/// fit [`forecast_metric`] uses.
pub fn calculate_goal_probability(
    store: &TimeSeriesStore,
    metric: Metric,
    target: f64,
    days_to_goal: u32,
    params: &ForecastParams,
) -> Result<GoalProbability> {
    if !target.is_finite() {
        return Err(Error::invalid("target", "must be a finite number"));
    }
    if days_to_goal == 0 {
        return Err(Error::invalid("daysToGoal", "must be at least 1"));
    }
    let values: Vec<f64> = store
        .read_metric(metric, params.window_days)
        .into_iter()
        .map(|p| p.value)
        .collect();
    let forecast = forecast_from_values(metric, &values, 0, params)?;
    let current = values[values.len() - 1];
    let slope = forecast.fit.slope;
    let probability = goal_probability(current, slope, target, days_to_goal)?;

    Ok(GoalProbability {
        metric,
        current,
        target,
        days_to_goal,
        current_slope: slope,
        required_slope: (target - current) / f64::from(days_to_goal),
        projected: current + slope * f64::from(days_to_goal),
        probability,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate, Utc};
    use vt_common::DailySnapshot;

    fn store_with(metric: Metric, values: &[f64]) -> TimeSeriesStore {
        let mut store = TimeSeriesStore::in_memory(30);
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        for (i, v) in values.iter().enumerate() {
            let date = start + Days::new(i as u64);
            let snap = DailySnapshot::new(date, Utc::now()).with(metric, *v).unwrap();
            store.store(date, snap).unwrap();
        }
        store
    }

    #[test]
    fn six_points_is_insufficient() {
        let store = store_with(Metric::Sleep, &[50.0; 6]);
        let err = forecast_metric(&store, Metric::Sleep, 7, &ForecastParams::default()).unwrap_err();
        assert_eq!(err.to_string(), "Insufficient data for forecast");
    }

    #[test]
    fn rising_series_extrapolates_and_clamps() {
        let values: Vec<f64> = (0..10).map(|i| 60.0 + 4.0 * i as f64).collect();
        let store = store_with(Metric::Learning, &values);
        let f = forecast_metric(&store, Metric::Learning, 7, &ForecastParams::default()).unwrap();
        assert_eq!(f.trend, Trend::Improving);
        assert!((f.fit.slope - 4.0).abs() < 1e-9);

        let points: Vec<ForecastPoint> = f.points().collect();
        assert_eq!(points.len(), 7);
        assert!((points[0].predicted_value - 100.0).abs() < 1e-9);
        assert!(points.iter().all(|p| p.predicted_value <= 100.0));
    }

    #[test]
    fn confidence_decays_with_distance() {
        let values: Vec<f64> = (0..15).map(|i| 50.0 + (i % 2) as f64).collect();
        let store = store_with(Metric::Sleep, &values);
        let f = forecast_metric(&store, Metric::Sleep, 7, &ForecastParams::default()).unwrap();
        assert_eq!(f.trend, Trend::Stable);
        // 15/30 -> 50% base; day 1: 50 * e^(-1/7) = 43.3
        let points: Vec<ForecastPoint> = f.points().collect();
        assert_eq!(points[0].confidence_percent, 43);
        for w in points.windows(2) {
            assert!(w[1].confidence_percent <= w[0].confidence_percent);
        }
    }

    #[test]
    fn points_iterator_restarts() {
        let values: Vec<f64> = (0..8).map(|i| 80.0 - 2.0 * i as f64).collect();
        let store = store_with(Metric::Screen, &values);
        let f = forecast_metric(&store, Metric::Screen, 3, &ForecastParams::default()).unwrap();
        assert_eq!(f.trend, Trend::Declining);
        assert_eq!(f.points().len(), 3);
        let first: Vec<_> = f.points().collect();
        let second: Vec<_> = f.points().collect();
        assert_eq!(first, second);
        assert_eq!(f.to_report().points, first);
    }

    #[test]
    fn goal_probability_on_track() {
        // required slope 2/day, current slope 2/day
        assert_eq!(goal_probability(60.0, 2.0, 80.0, 10).unwrap(), 100.0);
        // required 2, slope 1 -> gap 0.5
        assert!((goal_probability(60.0, 1.0, 80.0, 10).unwrap() - 50.0).abs() < 1e-9);
        // moving the wrong way
        assert_eq!(goal_probability(60.0, -3.0, 80.0, 10).unwrap(), 0.0);
    }

    #[test]
    fn goal_probability_small_required_slope_uses_unit_denominator() {
        // Target already met: required 0, so the gap is |0 - 0.5| / 1.
        assert!((goal_probability(80.0, 0.5, 80.0, 10).unwrap() - 50.0).abs() < 1e-9);
        assert_eq!(goal_probability(80.0, 0.0, 80.0, 10).unwrap(), 100.0);
        // required 0.2, slope 0: |0.2| / max(0.2, 1) = 0.2
        assert!((goal_probability(78.0, 0.0, 80.0, 10).unwrap() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn goal_zero_days_is_invalid() {
        let err = goal_probability(60.0, 1.0, 80.0, 0).unwrap_err();
        assert_eq!(err.code(), 20);
    }

    #[test]
    fn goal_from_store() {
        let values: Vec<f64> = (0..10).map(|i| 50.0 + i as f64).collect();
        let store = store_with(Metric::System, &values);
        let g = calculate_goal_probability(&store, Metric::System, 69.0, 10, &ForecastParams::default())
            .unwrap();
        assert_eq!(g.current, 59.0);
        assert!((g.current_slope - 1.0).abs() < 1e-9);
        assert!((g.projected - 69.0).abs() < 1e-9);
        assert!((g.probability - 100.0).abs() < 1e-9);
    }
}
