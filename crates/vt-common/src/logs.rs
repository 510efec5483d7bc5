//! Raw daily inputs supplied by the logging front end.
//!
//! Field names serialize in camelCase to match the collaborator contract.
//! Every domain log defaults to zeros, so a day with nothing logged for a
//! domain still scores deterministically.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Minutes spent learning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LearningLog {
    /// Deliberate practice, problem solving, writing.
    pub active: f64,
    /// Reading, lectures, podcasts.
    pub passive: f64,
}

/// Minutes of screen exposure by category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScreenLog {
    pub social: f64,
    pub entertainment: f64,
    pub productive: f64,
}

/// One logged meal. Nutrient fields are per 100 g of food.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Meal {
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fats_per_100g: f64,
    /// Monounsaturated fat.
    pub mufa: f64,
    /// Polyunsaturated fat.
    pub pufa: f64,
    pub trans_fats: f64,
    #[serde(rename = "essentialAA")]
    pub essential_aa: f64,
    #[serde(rename = "nonEssentialAA")]
    pub non_essential_aa: f64,
    pub calories_per_100g: f64,
    pub weight_grams: f64,
    pub is_junk: bool,
}

impl Meal {
    /// Multiplier converting per-100 g values into portion totals.
    pub fn portion_factor(&self) -> f64 {
        self.weight_grams / 100.0
    }
}

/// Meals eaten and water drunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NutritionLog {
    pub meals: Vec<Meal>,
    pub hydration_ml: f64,
}

/// Training load for the day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrainingLog {
    /// Sum of sets × reps × load.
    pub total_volume_kg: f64,
}

/// Night sleep plus daytime naps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SleepLog {
    pub duration_hours: f64,
    /// Self-rated quality on a 1–10 scale (0 = not rated).
    #[serde(rename = "qualityScore1to10")]
    pub quality_score: f64,
    pub nap_minutes: f64,
}

/// Aggregate of one day's logs across all domains.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyLogs {
    pub learning: LearningLog,
    pub screen: ScreenLog,
    pub nutrition: NutritionLog,
    pub training: TrainingLog,
    pub sleep: SleepLog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Body metrics used for energy targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: f64,
    pub gender: Gender,
}

/// A saved body-weight reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightEntry {
    pub date: NaiveDate,
    pub weight_kg: f64,
}
