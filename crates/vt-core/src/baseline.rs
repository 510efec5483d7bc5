//! Trailing-window baseline estimation.
//!
//! A baseline summarizes the recent history of one metric so today's value
//! can be read as "how unusual is this for me". With fewer than
//! `min_samples` values the neutral fallback is returned and z-scores
//! collapse to 0, so a young archive never produces extreme scores.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::logging::{event_names, Stage};
use crate::store::{MetricPoint, TimeSeriesStore};
use vt_common::Metric;
use vt_config::tunables::BaselineParams;
use vt_math::Moments;

/// Mean and spread of one metric over a trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baseline {
    pub mean: f64,
    /// Population standard deviation, floored.
    #[serde(rename = "stddev")]
    pub std_dev: f64,
    pub sample_count: usize,
    /// False when the neutral fallback was used.
    pub sufficient: bool,
}

impl Baseline {
    /// A baseline computed from data.
    pub fn computed(mean: f64, std_dev: f64, sample_count: usize) -> Self {
        Self {
            mean,
            std_dev,
            sample_count,
            sufficient: true,
        }
    }

    /// The neutral default used when history is too short.
    pub fn fallback(sample_count: usize, params: &BaselineParams) -> Self {
        Self {
            mean: params.fallback_mean,
            std_dev: params.fallback_std_dev,
            sample_count,
            sufficient: false,
        }
    }

    /// Standardized distance of `value` from the mean; 0 when the baseline
    /// is insufficient.
    pub fn z_score(&self, value: f64) -> f64 {
        if !self.sufficient || self.std_dev <= 0.0 {
            return 0.0;
        }
        (value - self.mean) / self.std_dev
    }
}

/// Baseline over a slice of values.
pub fn baseline_from_values(values: &[f64], params: &BaselineParams) -> Baseline {
    match Moments::of(values) {
        Some(m) if m.n >= params.min_samples => {
            Baseline::computed(m.mean, m.std_dev_floored(params.min_std_dev), m.n)
        }
        Some(m) => Baseline::fallback(m.n, params),
        None => Baseline::fallback(0, params),
    }
}

/// Baseline of `metric` over the last `window_days` archived dates.
pub fn calculate_baseline(
    store: &TimeSeriesStore,
    metric: Metric,
    window_days: usize,
    params: &BaselineParams,
) -> Baseline {
    let points = store.read_metric(metric, window_days);
    finish(metric, &points, params)
}

/// Baseline of `metric` over the last `window_days` archived dates strictly
/// before `date`. Re-scoring `date` never sees its own snapshot.
pub fn calculate_baseline_before(
    store: &TimeSeriesStore,
    metric: Metric,
    window_days: usize,
    date: NaiveDate,
    params: &BaselineParams,
) -> Baseline {
    let points = store.read_metric_before(metric, window_days, date);
    finish(metric, &points, params)
}

fn finish(metric: Metric, points: &[MetricPoint], params: &BaselineParams) -> Baseline {
    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    let baseline = baseline_from_values(&values, params);
    if !baseline.sufficient {
        debug!(
            event = event_names::BASELINE_FALLBACK,
            stage = %Stage::Baseline,
            %metric,
            samples = baseline.sample_count,
            required = params.min_samples,
            "baseline fallback"
        );
    }
    baseline
}

/// `z = (value - mean) / stddev`, or 0 for an insufficient baseline.
pub fn z_score(value: f64, baseline: &Baseline) -> f64 {
    baseline.z_score(value)
}
