//! Cross-metric correlation structure.
//!
//! Pairs are aligned per date: a date contributes to the `(a, b)` cell only
//! when both metrics were recorded that day. Cells with fewer than three
//! aligned points, or with a constant series, read as 0.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::logging::{event_names, Stage};
use crate::store::TimeSeriesStore;
use vt_common::{DailySnapshot, Error, Metric, Result};
use vt_config::tunables::CorrelationParams;
use vt_math::{pearson, Moments};

/// Square symmetric matrix of Pearson coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationMatrix {
    pub window_days: usize,
    pub metrics: Vec<Metric>,
    pub cells: BTreeMap<Metric, BTreeMap<Metric, f64>>,
}

impl CorrelationMatrix {
    /// Coefficient for `(a, b)`; 0 for metrics not in the matrix.
    pub fn get(&self, a: Metric, b: Metric) -> f64 {
        self.cells
            .get(&a)
            .and_then(|row| row.get(&b))
            .copied()
            .unwrap_or(0.0)
    }
}

/// Values of `a` and `b` on the dates where both are present.
fn aligned<'a>(
    snapshots: impl Iterator<Item = &'a DailySnapshot>,
    a: Metric,
    b: Metric,
) -> (Vec<f64>, Vec<f64>) {
    snapshots
        .filter_map(|s| Some((s.get(a)?, s.get(b)?)))
        .unzip()
}

/// Correlation matrix over an explicit list of snapshots.
pub fn correlation_matrix_of(snapshots: &[&DailySnapshot], window_days: usize) -> CorrelationMatrix {
    let mut cells = BTreeMap::new();
    for a in Metric::ALL {
        let mut row = BTreeMap::new();
        for b in Metric::ALL {
            let (x, y) = aligned(snapshots.iter().copied(), a, b);
            row.insert(b, pearson(&x, &y));
        }
        cells.insert(a, row);
    }
    CorrelationMatrix {
        window_days,
        metrics: Metric::ALL.to_vec(),
        cells,
    }
}

/// Pearson matrix of all six metrics over the last `days` archived dates.
///
/// Diagonal cells are computed like any other, so a metric with fewer than
/// three points or no variance has 0 on the diagonal.
pub fn generate_correlation_matrix(store: &TimeSeriesStore, days: usize) -> CorrelationMatrix {
    let snapshots: Vec<&DailySnapshot> = store.recent(days).collect();
    correlation_matrix_of(&snapshots, days)
}

/// Qualitative size of a coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Strong,
    Moderate,
    Weak,
}

impl Strength {
    pub fn classify(r: f64, params: &CorrelationParams) -> Self {
        let r = r.abs();
        if r >= params.strong_threshold {
            Strength::Strong
        } else if r >= params.moderate_threshold {
            Strength::Moderate
        } else {
            Strength::Weak
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Positive,
    Negative,
    None,
}

impl Direction {
    pub fn of(r: f64) -> Self {
        if r > 0.0 {
            Direction::Positive
        } else if r < 0.0 {
            Direction::Negative
        } else {
            Direction::None
        }
    }
}

/// One unordered metric pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationPair {
    pub metric_a: Metric,
    pub metric_b: Metric,
    pub coefficient: f64,
    pub strength: Strength,
    pub direction: Direction,
}

/// Off-diagonal pairs sorted by `|r|` descending, at most `params.top_pairs`.
///
/// `(a, b)` and `(b, a)` are the same pair and appear once, keyed in metric
/// order. Ties keep metric order.
pub fn find_strongest_correlations(
    matrix: &CorrelationMatrix,
    params: &CorrelationParams,
) -> Vec<CorrelationPair> {
    let mut seen = BTreeSet::new();
    let mut pairs = Vec::new();
    for (&a, row) in &matrix.cells {
        for (&b, &r) in row {
            if a == b {
                continue;
            }
            let key = if a < b { (a, b) } else { (b, a) };
            if !seen.insert(key) {
                continue;
            }
            pairs.push(CorrelationPair {
                metric_a: key.0,
                metric_b: key.1,
                coefficient: r,
                strength: Strength::classify(r, params),
                direction: Direction::of(r),
            });
        }
    }
    pairs.sort_by(|x, y| y.coefficient.abs().total_cmp(&x.coefficient.abs()));
    pairs.truncate(params.top_pairs);
    pairs
}

/// Standardized effect of one predictor on the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictorEffect {
    pub metric: Metric,
    pub correlation: f64,
    /// `r · (sd_y / sd_x)`, each standard deviation floored.
    pub beta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionReport {
    pub target: Metric,
    pub sample_size: usize,
    /// Sorted by `|beta|` descending.
    pub predictors: Vec<PredictorEffect>,
}

/// Per-predictor effects on `target` over complete cases.
///
/// A date is a complete case when the target and every predictor were
/// recorded. With fewer than `params.min_regression_cases` complete cases
/// the result is [`Error::InsufficientData`]. The target is dropped from
/// the predictor list if present.
pub fn multi_variate_regression(
    store: &TimeSeriesStore,
    target: Metric,
    predictors: &[Metric],
    params: &CorrelationParams,
) -> Result<RegressionReport> {
    let mut unique: Vec<Metric> = Vec::new();
    for &p in predictors {
        if p != target && !unique.contains(&p) {
            unique.push(p);
        }
    }
    if unique.is_empty() {
        return Err(Error::invalid(
            "predictors",
            "at least one predictor other than the target is required",
        ));
    }

    let complete: Vec<&DailySnapshot> = store
        .recent(params.window_days)
        .filter(|s| s.get(target).is_some() && unique.iter().all(|&p| s.get(p).is_some()))
        .collect();

    if complete.len() < params.min_regression_cases {
        debug!(
            event = event_names::REGRESSION_INSUFFICIENT,
            stage = %Stage::Correlate,
            %target,
            cases = complete.len(),
            required = params.min_regression_cases,
            "not enough complete cases for regression"
        );
        return Err(Error::insufficient(
            "regression",
            params.min_regression_cases,
            complete.len(),
        ));
    }

    let y: Vec<f64> = complete.iter().filter_map(|s| s.get(target)).collect();
    let sd_y = Moments::of(&y)
        .map(|m| m.std_dev_floored(params.min_std_dev))
        .unwrap_or(params.min_std_dev);

    let mut effects: Vec<PredictorEffect> = unique
        .iter()
        .map(|&metric| {
            let x: Vec<f64> = complete.iter().filter_map(|s| s.get(metric)).collect();
            let r = pearson(&x, &y);
            let sd_x = Moments::of(&x)
                .map(|m| m.std_dev_floored(params.min_std_dev))
                .unwrap_or(params.min_std_dev);
            PredictorEffect {
                metric,
                correlation: r,
                beta: r * (sd_y / sd_x),
            }
        })
        .collect();
    effects.sort_by(|a, b| b.beta.abs().total_cmp(&a.beta.abs()));

    Ok(RegressionReport {
        target,
        sample_size: complete.len(),
        predictors: effects,
    })
}
