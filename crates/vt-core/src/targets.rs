//! Adaptive calorie and macro targets.
//!
//! Energy needs start from the Mifflin-St Jeor BMR. The direction of the
//! recent body-weight trend picks a deficit, maintenance or surplus
//! multiplier; the macro split follows from calories and body weight.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::logging::{event_names, Stage};
use crate::scoring::nutrition::Macros;
use vt_common::{Gender, UserProfile, WeightEntry};
use vt_config::tunables::TargetParams;
use vt_math::ols;

const KCAL_PER_G_FAT: f64 = 9.0;
const KCAL_PER_G_CARB: f64 = 4.0;
const KCAL_PER_G_PROTEIN: f64 = 4.0;

/// Direction of the body-weight series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightTrend {
    Increasing,
    Decreasing,
    Stable,
}

impl std::fmt::Display for WeightTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightTrend::Increasing => write!(f, "increasing"),
            WeightTrend::Decreasing => write!(f, "decreasing"),
            WeightTrend::Stable => write!(f, "stable"),
        }
    }
}

/// Fitted weight trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightTrendReport {
    pub trend: WeightTrend,
    /// OLS slope in kg per day; 0 when there were too few entries.
    pub slope_kg_per_day: f64,
    pub points: usize,
}

/// Daily calorie and macro targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveTargets {
    pub calories: f64,
    /// Grams.
    pub protein: f64,
    /// Grams.
    pub carbs: f64,
    /// Grams.
    pub fats: f64,
    pub trend: WeightTrend,
    pub recommendation: String,
    pub bmr: f64,
    pub slope_kg_per_day: f64,
}

impl AdaptiveTargets {
    /// Macro targets used as the nutrition optimum.
    pub fn macros(&self) -> Macros {
        Macros::new(self.protein, self.carbs, self.fats)
    }
}

/// Mifflin-St Jeor basal metabolic rate in kcal/day.
pub fn bmr(profile: &UserProfile) -> f64 {
    let base = 10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * profile.age_years;
    match profile.gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// OLS trend over `history` with x measured in days since the first entry.
///
/// Entries are sorted by date first, so input order does not matter.
pub fn weight_trend(history: &[WeightEntry], params: &TargetParams) -> WeightTrendReport {
    let stable = WeightTrendReport {
        trend: WeightTrend::Stable,
        slope_kg_per_day: 0.0,
        points: history.len(),
    };
    if history.len() < params.min_points {
        return stable;
    }

    let mut sorted = history.to_vec();
    sorted.sort_by_key(|e| e.date);
    let Some(first) = sorted.first().map(|e| e.date) else {
        return stable;
    };
    let x: Vec<f64> = sorted
        .iter()
        .map(|e| (e.date - first).num_days() as f64)
        .collect();
    let y: Vec<f64> = sorted.iter().map(|e| e.weight_kg).collect();

    let slope = ols(&x, &y).map(|fit| fit.slope).unwrap_or(0.0);
    let trend = if slope > params.trend_threshold_kg {
        WeightTrend::Increasing
    } else if slope < -params.trend_threshold_kg {
        WeightTrend::Decreasing
    } else {
        WeightTrend::Stable
    };

    WeightTrendReport {
        trend,
        slope_kg_per_day: slope,
        points: sorted.len(),
    }
}

fn recommendation(trend: WeightTrend) -> &'static str {
    match trend {
        WeightTrend::Increasing => {
            "Weight is trending up; calories are set to a deficit to slow the gain."
        }
        WeightTrend::Decreasing => {
            "Weight is trending down; calories are set to a surplus to protect lean mass."
        }
        WeightTrend::Stable => "Weight is stable; calories are set to maintenance.",
    }
}

/// Targets for `profile` given its recent weight history.
pub fn adaptive_targets(
    profile: &UserProfile,
    history: &[WeightEntry],
    params: &TargetParams,
) -> AdaptiveTargets {
    let bmr = bmr(profile);
    let report = weight_trend(history, params);
    let factor = match report.trend {
        WeightTrend::Increasing => params.deficit_factor,
        WeightTrend::Decreasing => params.surplus_factor,
        WeightTrend::Stable => params.maintenance_factor,
    };
    let calories = bmr * factor;
    let protein = profile.weight_kg * params.protein_g_per_kg;
    let fat_calories = calories * params.fat_share;
    let fats = fat_calories / KCAL_PER_G_FAT;
    let carbs = ((calories - protein * KCAL_PER_G_PROTEIN - fat_calories) / KCAL_PER_G_CARB).max(0.0);

    debug!(
        event = event_names::TARGETS_COMPUTED,
        stage = %Stage::Targets,
        trend = %report.trend,
        slope = report.slope_kg_per_day,
        calories,
        "adaptive targets computed"
    );

    AdaptiveTargets {
        calories,
        protein,
        carbs,
        fats,
        trend: report.trend,
        recommendation: recommendation(report.trend).to_string(),
        bmr,
        slope_kg_per_day: report.slope_kg_per_day,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn profile(gender: Gender) -> UserProfile {
        UserProfile {
            weight_kg: 80.0,
            height_cm: 180.0,
            age_years: 30.0,
            gender,
        }
    }

    fn series(start_kg: f64, per_day: f64, n: u64) -> Vec<WeightEntry> {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        (0..n)
            .map(|i| WeightEntry {
                date: start + Days::new(i),
                weight_kg: start_kg + per_day * i as f64,
            })
            .collect()
    }

    #[test]
    fn bmr_by_gender() {
        // 800 + 1125 - 150 + 5 = 1780
        assert!(approx(bmr(&profile(Gender::Male)), 1780.0, 1e-9));
        assert!(approx(bmr(&profile(Gender::Female)), 1614.0, 1e-9));
    }

    #[test]
    fn short_history_is_stable() {
        let params = TargetParams::default();
        let report = weight_trend(&series(80.0, 1.0, 2), &params);
        assert_eq!(report.trend, WeightTrend::Stable);
        assert_eq!(report.points, 2);
    }

    #[test]
    fn empty_history_without_minimum_is_stable() {
        let params = TargetParams {
            min_points: 0,
            ..TargetParams::default()
        };
        let report = weight_trend(&[], &params);
        assert_eq!(report.trend, WeightTrend::Stable);
        assert_eq!(report.points, 0);
        assert_eq!(report.slope_kg_per_day, 0.0);
    }

    #[test]
    fn slope_is_per_day_even_with_gaps() {
        let params = TargetParams::default();
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let history: Vec<WeightEntry> = [0u64, 2, 10]
            .iter()
            .map(|&d| WeightEntry {
                date: start + Days::new(d),
                weight_kg: 80.0 + 0.2 * d as f64,
            })
            .collect();
        let report = weight_trend(&history, &params);
        assert!(approx(report.slope_kg_per_day, 0.2, 1e-9));
        assert_eq!(report.trend, WeightTrend::Increasing);
    }

    #[test]
    fn unsorted_input_is_sorted() {
        let params = TargetParams::default();
        let mut history = series(80.0, -0.3, 5);
        history.reverse();
        assert_eq!(weight_trend(&history, &params).trend, WeightTrend::Decreasing);
    }

    #[test]
    fn stable_targets_use_maintenance() {
        let params = TargetParams::default();
        let t = adaptive_targets(&profile(Gender::Male), &series(80.0, 0.0, 7), &params);
        assert_eq!(t.trend, WeightTrend::Stable);
        assert!(approx(t.calories, 1780.0 * 1.55, 1e-9));
        assert!(approx(t.protein, 176.0, 1e-9));
        assert!(approx(t.fats, t.calories * 0.25 / 9.0, 1e-9));
        assert!(approx(
            t.carbs,
            (t.calories - 176.0 * 4.0 - t.calories * 0.25) / 4.0,
            1e-9
        ));
    }

    #[test]
    fn gaining_weight_gets_deficit_losing_gets_surplus() {
        let params = TargetParams::default();
        let p = profile(Gender::Female);
        let up = adaptive_targets(&p, &series(80.0, 0.5, 7), &params);
        let down = adaptive_targets(&p, &series(80.0, -0.5, 7), &params);
        assert!(approx(up.calories, 1614.0 * 1.35, 1e-9));
        assert!(approx(down.calories, 1614.0 * 1.65, 1e-9));
        assert!(up.recommendation.contains("deficit"));
        assert!(down.recommendation.contains("surplus"));
    }
}
