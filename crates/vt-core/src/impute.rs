//! Bayesian inference of missing daily scores.
//!
//! The prior is the metric's recent history. When enough values share the
//! target date's weekday they form a likelihood, and the two are fused in
//! precision form, so weekly rhythms (lighter weekends, training days) pull
//! the estimate without discarding the overall level.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::logging::{event_names, Stage};
use crate::store::{MetricPoint, TimeSeriesStore};
use vt_common::Metric;
use vt_config::tunables::ImputationParams;
use vt_math::{clamp_score, Gaussian, Moments};

/// How much an imputed value can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImputationConfidence {
    None,
    Low,
    Medium,
    High,
}

impl std::fmt::Display for ImputationConfidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ImputationConfidence::None => "none",
            ImputationConfidence::Low => "low",
            ImputationConfidence::Medium => "medium",
            ImputationConfidence::High => "high",
        };
        write!(f, "{}", s)
    }
}

/// Estimator that produced an imputed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationMethod {
    /// Too little history: the population mean.
    PopulationMean,
    /// History prior only (too few same-weekday values).
    HistoricalPrior,
    /// Prior fused with a same-weekday likelihood.
    BayesianWeekday,
}

/// An inferred score for a date without data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImputedValue {
    pub value: f64,
    pub confidence: ImputationConfidence,
    pub method: ImputationMethod,
    /// Posterior standard deviation.
    pub uncertainty: f64,
    pub history_points: usize,
    pub same_weekday_points: usize,
}

fn classify(total: usize, same_weekday: usize, params: &ImputationParams) -> ImputationConfidence {
    if total < params.min_history {
        ImputationConfidence::None
    } else if total < params.low_confidence_history {
        ImputationConfidence::Low
    } else if same_weekday >= params.high_confidence_same_weekday {
        ImputationConfidence::High
    } else if total >= params.medium_confidence_history {
        ImputationConfidence::Medium
    } else {
        ImputationConfidence::Low
    }
}

/// Impute `date` from an explicit history, which should not contain
/// `date` itself.
pub fn impute_from_history(
    history: &[MetricPoint],
    date: NaiveDate,
    params: &ImputationParams,
) -> ImputedValue {
    let values: Vec<f64> = history.iter().map(|p| p.value).collect();
    let prior = match Moments::of(&values) {
        Some(m) if m.n >= params.min_history => m,
        _ => {
            return ImputedValue {
                value: params.population_mean,
                confidence: ImputationConfidence::None,
                method: ImputationMethod::PopulationMean,
                uncertainty: params.population_std_dev,
                history_points: values.len(),
                same_weekday_points: 0,
            };
        }
    };

    let weekday = date.weekday();
    let same_day: Vec<f64> = history
        .iter()
        .filter(|p| p.date.weekday() == weekday)
        .map(|p| p.value)
        .collect();

    let prior_belief = Gaussian::new(prior.mean, prior.variance_floored(params.min_variance));
    let (posterior, method) = match Moments::of(&same_day) {
        Some(like) if like.n >= params.min_same_weekday => {
            let likelihood = Gaussian::new(like.mean, like.variance_floored(params.min_variance));
            (prior_belief.fuse(&likelihood), ImputationMethod::BayesianWeekday)
        }
        _ => (prior_belief, ImputationMethod::HistoricalPrior),
    };

    ImputedValue {
        value: clamp_score(posterior.mean),
        confidence: classify(prior.n, same_day.len(), params),
        method,
        uncertainty: posterior.std_dev(),
        history_points: prior.n,
        same_weekday_points: same_day.len(),
    }
}

/// Infer `metric` on `date` from the archive's imputation window.
///
/// Any archived value for `date` itself is ignored.
pub fn impute_missing_score(
    store: &TimeSeriesStore,
    metric: Metric,
    date: NaiveDate,
    params: &ImputationParams,
) -> ImputedValue {
    let history: Vec<MetricPoint> = store
        .read_metric(metric, params.window_days)
        .into_iter()
        .filter(|p| p.date != date)
        .collect();
    let imputed = impute_from_history(&history, date, params);
    if imputed.method == ImputationMethod::PopulationMean {
        debug!(
            event = event_names::IMPUTE_FALLBACK,
            stage = %Stage::Impute,
            %metric,
            %date,
            history = imputed.history_points,
            "too little history; using population mean"
        );
    }
    imputed
}

/// One calendar day of a gap-filled series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilledPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub is_imputed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imputation: Option<ImputedValue>,
}

/// Walk every date from the earliest to the latest in `data` (inclusive),
/// keeping observed values and imputing the rest.
///
/// Observed points are used as given; `data` need not be sorted. Empty
/// input yields an empty series.
pub fn fill_gaps(
    data: &[MetricPoint],
    metric: Metric,
    store: &TimeSeriesStore,
    params: &ImputationParams,
) -> Vec<FilledPoint> {
    let Some(first) = data.iter().map(|p| p.date).min() else {
        return Vec::new();
    };
    let Some(last) = data.iter().map(|p| p.date).max() else {
        return Vec::new();
    };

    let mut filled = Vec::new();
    let mut date = first;
    loop {
        match data.iter().find(|p| p.date == date) {
            Some(point) => filled.push(FilledPoint {
                date,
                value: point.value,
                is_imputed: false,
                imputation: None,
            }),
            None => {
                let imputed = impute_missing_score(store, metric, date, params);
                debug!(
                    event = event_names::IMPUTE_GAP_FILLED,
                    stage = %Stage::Impute,
                    %metric,
                    %date,
                    value = imputed.value,
                    confidence = %imputed.confidence,
                    "gap filled"
                );
                filled.push(FilledPoint {
                    date,
                    value: imputed.value,
                    is_imputed: true,
                    imputation: Some(imputed),
                });
            }
        }
        if date >= last {
            break;
        }
        match date.checked_add_days(Days::new(1)) {
            Some(next) => date = next,
            None => break,
        }
    }
    filled
}
