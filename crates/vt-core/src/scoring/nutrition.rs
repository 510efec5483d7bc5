//! Nutrition scoring.
//!
//! The base score is an exponential decay of the total macro distance from
//! the day's targets. Fat quality and amino-acid completeness are blended
//! in when the day has any fat or protein, a junk-calorie penalty is
//! subtracted, and the result is scaled by hydration.

use serde::{Deserialize, Serialize};

use vt_common::{Meal, NutritionLog};
use vt_config::tunables::NutritionParams;
use vt_math::{clamp_score, lerp_clamped};

/// Grams of each macronutrient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl Macros {
    pub fn new(protein: f64, carbs: f64, fats: f64) -> Self {
        Self {
            protein,
            carbs,
            fats,
        }
    }

    /// Sum of absolute per-macro differences, in grams.
    pub fn distance(&self, other: &Macros) -> f64 {
        (self.protein - other.protein).abs()
            + (self.carbs - other.carbs).abs()
            + (self.fats - other.fats).abs()
    }
}

/// Portion-scaled totals over every meal of the day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealTotals {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub mufa: f64,
    pub pufa: f64,
    pub trans_fats: f64,
    #[serde(rename = "essentialAA")]
    pub essential_aa: f64,
    pub calories: f64,
    pub junk_calories: f64,
}

impl MealTotals {
    pub fn from_meals(meals: &[Meal]) -> Self {
        meals.iter().fold(Self::default(), |mut acc, meal| {
            let f = meal.portion_factor();
            acc.protein += meal.protein_per_100g * f;
            acc.carbs += meal.carbs_per_100g * f;
            acc.fats += meal.fats_per_100g * f;
            acc.mufa += meal.mufa * f;
            acc.pufa += meal.pufa * f;
            acc.trans_fats += meal.trans_fats * f;
            acc.essential_aa += meal.essential_aa * f;
            let calories = meal.calories_per_100g * f;
            acc.calories += calories;
            if meal.is_junk {
                acc.junk_calories += calories;
            }
            acc
        })
    }

    pub fn macros(&self) -> Macros {
        Macros::new(self.protein, self.carbs, self.fats)
    }

    /// Share of calories from meals flagged as junk; 0 with no calories.
    pub fn junk_ratio(&self) -> f64 {
        if self.calories > 0.0 {
            (self.junk_calories / self.calories).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// `exp(-distance / sigma) * 100`; exactly 100 when `actual == optimal`.
pub fn macro_score(actual: &Macros, optimal: &Macros, sigma: f64) -> f64 {
    let distance = actual.distance(optimal);
    if distance == 0.0 {
        return 100.0;
    }
    clamp_score((-distance / sigma).exp() * 100.0)
}

/// Unsaturated share of total fat, discounted exponentially by trans fat.
///
/// `None` when no fat was eaten.
pub fn fat_quality_index(totals: &MealTotals, params: &NutritionParams) -> Option<f64> {
    if totals.fats <= 0.0 {
        return None;
    }
    let unsaturated_share = (totals.mufa + totals.pufa) / totals.fats * 100.0;
    Some(clamp_score(
        unsaturated_share / (params.trans_fat_decay * totals.trans_fats).exp(),
    ))
}

/// Closeness of the essential amino-acid ratio to its target.
///
/// `None` when no protein was eaten.
pub fn amino_acid_completeness(totals: &MealTotals, params: &NutritionParams) -> Option<f64> {
    if totals.protein <= 0.0 {
        return None;
    }
    let ratio = totals.essential_aa / totals.protein;
    Some(clamp_score(
        (-params.amino_decay * (ratio - params.amino_target_ratio).abs()).exp() * 100.0,
    ))
}

/// Points subtracted for junk calories: `(e^(k·ratio) - 1) · scale`.
pub fn junk_penalty(junk_ratio: f64, params: &NutritionParams) -> f64 {
    ((params.junk_exponent * junk_ratio).exp() - 1.0) * params.junk_scale
}

/// Hydration mapped linearly onto `[floor, ceiling]`.
pub fn hydration_multiplier(hydration_ml: f64, params: &NutritionParams) -> f64 {
    lerp_clamped(
        hydration_ml,
        0.0,
        params.hydration_full_ml,
        params.hydration_floor,
        params.hydration_ceiling,
    )
}

/// Every nutrition sub-score for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionBreakdown {
    pub totals: MealTotals,
    pub optimal: Macros,
    pub macro_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat_quality: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amino_completeness: Option<f64>,
    pub junk_penalty: f64,
    pub hydration_multiplier: f64,
    pub score: f64,
}

pub fn nutrition_breakdown(
    log: &NutritionLog,
    optimal: &Macros,
    params: &NutritionParams,
) -> NutritionBreakdown {
    let totals = MealTotals::from_meals(&log.meals);
    let base = macro_score(&totals.macros(), optimal, params.macro_sigma);

    let fat_quality = fat_quality_index(&totals, params);
    let amino_completeness = amino_acid_completeness(&totals, params);

    let mut score = base;
    if let Some(fqi) = fat_quality {
        score = score * (1.0 - params.fat_quality_weight) + fqi * params.fat_quality_weight;
    }
    if let Some(aac) = amino_completeness {
        score = score * (1.0 - params.amino_weight) + aac * params.amino_weight;
    }

    let junk = junk_penalty(totals.junk_ratio(), params);
    let hydration = hydration_multiplier(log.hydration_ml, params);
    let score = clamp_score((score - junk) * hydration);

    NutritionBreakdown {
        totals,
        optimal: *optimal,
        macro_score: base,
        fat_quality,
        amino_completeness,
        junk_penalty: junk,
        hydration_multiplier: hydration,
        score,
    }
}

pub fn nutrition_score(log: &NutritionLog, optimal: &Macros, params: &NutritionParams) -> f64 {
    nutrition_breakdown(log, optimal, params).score
}
