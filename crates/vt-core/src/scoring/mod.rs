//! Daily score composition.
//!
//! [`score_day`] is the single entry point from raw logs to scores: it
//! validates the inputs, derives the nutrition optimum from the adaptive
//! targets, scores each domain against the archive as it stood before the
//! day, and composes the system score and insight. It never writes to the
//! store.

pub mod composite;
pub mod domains;
pub mod nutrition;

pub use composite::{build_insight, system_score, Insight, ModuleScore, ModuleScores};
pub use domains::{
    effective_load, fatigue_penalty, learning_score, screen_score, sleep_breakdown, sleep_score,
    training_score, SleepBreakdown,
};
pub use nutrition::{macro_score, nutrition_breakdown, Macros, MealTotals, NutritionBreakdown};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::baseline::{calculate_baseline_before, Baseline};
use crate::logging::{event_names, Stage};
use crate::store::TimeSeriesStore;
use crate::targets::{adaptive_targets, AdaptiveTargets};
use vt_common::{DailyLogs, Metric, Result, UserProfile, Validate, WeightEntry};
use vt_config::Tunables;
use vt_math::{clamp_score, round_score};

/// Everything computed while scoring one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayScore {
    pub date: NaiveDate,
    pub scores: ModuleScores,
    pub insight: Insight,
    pub learning_baseline: Baseline,
    pub effective_learning_load: f64,
    pub sleep: SleepBreakdown,
    pub nutrition: NutritionBreakdown,
    pub targets: AdaptiveTargets,
}

/// Score one day's logs.
///
/// The learning baseline is taken over the archived `learning` series
/// strictly before `date`, so recomputing a day that is already archived
/// yields the same result.
pub fn score_day(
    date: NaiveDate,
    logs: &DailyLogs,
    profile: &UserProfile,
    weight_history: &[WeightEntry],
    store: &TimeSeriesStore,
    tunables: &Tunables,
) -> Result<DayScore> {
    logs.validate()?;
    profile.validate()?;
    for entry in weight_history {
        entry.validate()?;
    }

    let targets = adaptive_targets(profile, weight_history, &tunables.targets);

    let learning_baseline = calculate_baseline_before(
        store,
        Metric::Learning,
        tunables.baseline.window_days,
        date,
        &tunables.baseline,
    );
    let learning = learning_score(&logs.learning, &learning_baseline, &tunables.learning);
    let screen = screen_score(&logs.screen, &tunables.screen);
    let nutrition = nutrition_breakdown(&logs.nutrition, &targets.macros(), &tunables.nutrition);
    let training = training_score(&logs.training, &tunables.training);
    let sleep = sleep_breakdown(&logs.sleep, &tunables.sleep);

    let mut scores = ModuleScores {
        learning: round_score(learning),
        screen: round_score(screen),
        nutrition: round_score(nutrition.score),
        training: round_score(training),
        sleep: round_score(sleep.score),
        system: 0,
    };
    scores.system = round_score(clamp_score(system_score(
        &scores.domains(),
        &tunables.system,
    )));
    let insight = build_insight(&scores, &tunables.system);

    debug!(
        event = event_names::SCORE_RECOMPUTED,
        stage = %Stage::Score,
        %date,
        system = scores.system,
        liability = %insight.liability.id,
        "scores recomputed"
    );

    Ok(DayScore {
        date,
        scores,
        insight,
        learning_baseline,
        effective_learning_load: effective_load(&logs.learning, &tunables.learning),
        sleep,
        nutrition,
        targets,
    })
}

/// Recompute the six integer scores for `date`.
///
/// Pure with respect to the store: reading only, never writing.
pub fn recompute_scores(
    date: NaiveDate,
    logs: &DailyLogs,
    profile: &UserProfile,
    weight_history: &[WeightEntry],
    store: &TimeSeriesStore,
    tunables: &Tunables,
) -> Result<ModuleScores> {
    score_day(date, logs, profile, weight_history, store, tunables).map(|day| day.scores)
}
