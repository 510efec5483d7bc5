//! Boundary validation for caller-supplied values.
//!
//! Blank form fields become an explicit default chosen by the caller;
//! anything else that is not a finite, non-negative number is rejected
//! before it can reach the scoring engine.

use crate::error::{Error, Result};
use crate::logs::{DailyLogs, Meal, UserProfile, WeightEntry};

/// Parse a user-entered quantity.
///
/// - blank (after trimming) → `Ok(default)`
/// - a finite number `>= 0` → `Ok(value)`
/// - anything else → [`Error::InvalidInput`] naming `field`
pub fn parse_measurement(field: &str, raw: &str, default: f64) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| Error::invalid(field, format!("not a number: {:?}", raw)))?;
    check_quantity(field, value)?;
    Ok(value)
}

/// Types that can check themselves before entering the engine.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn check_quantity(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::invalid(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(Error::invalid(field, format!("must be >= 0, got {}", value)));
    }
    Ok(())
}

fn check_positive(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::invalid(field, format!("must be > 0, got {}", value)));
    }
    Ok(())
}

impl Validate for Meal {
    fn validate(&self) -> Result<()> {
        check_quantity("meal.proteinPer100g", self.protein_per_100g)?;
        check_quantity("meal.carbsPer100g", self.carbs_per_100g)?;
        check_quantity("meal.fatsPer100g", self.fats_per_100g)?;
        check_quantity("meal.mufa", self.mufa)?;
        check_quantity("meal.pufa", self.pufa)?;
        check_quantity("meal.transFats", self.trans_fats)?;
        check_quantity("meal.essentialAA", self.essential_aa)?;
        check_quantity("meal.nonEssentialAA", self.non_essential_aa)?;
        check_quantity("meal.caloriesPer100g", self.calories_per_100g)?;
        check_quantity("meal.weightGrams", self.weight_grams)?;
        if self.mufa + self.pufa + self.trans_fats > self.fats_per_100g + 1e-9 {
            return Err(Error::invalid(
                "meal.fatsPer100g",
                "fat subtypes exceed total fat",
            ));
        }
        Ok(())
    }
}

impl Validate for DailyLogs {
    fn validate(&self) -> Result<()> {
        check_quantity("learning.active", self.learning.active)?;
        check_quantity("learning.passive", self.learning.passive)?;

        check_quantity("screen.social", self.screen.social)?;
        check_quantity("screen.entertainment", self.screen.entertainment)?;
        check_quantity("screen.productive", self.screen.productive)?;

        for meal in &self.nutrition.meals {
            meal.validate()?;
        }
        check_quantity("nutrition.hydrationMl", self.nutrition.hydration_ml)?;

        check_quantity("training.totalVolumeKg", self.training.total_volume_kg)?;

        check_quantity("sleep.durationHours", self.sleep.duration_hours)?;
        if self.sleep.duration_hours > 24.0 {
            return Err(Error::invalid("sleep.durationHours", "must be <= 24"));
        }
        check_quantity("sleep.qualityScore1to10", self.sleep.quality_score)?;
        if self.sleep.quality_score > 10.0 {
            return Err(Error::invalid("sleep.qualityScore1to10", "must be within 0..=10"));
        }
        check_quantity("sleep.napMinutes", self.sleep.nap_minutes)?;
        Ok(())
    }
}

impl Validate for UserProfile {
    fn validate(&self) -> Result<()> {
        check_positive("profile.weightKg", self.weight_kg)?;
        check_positive("profile.heightCm", self.height_cm)?;
        check_positive("profile.ageYears", self.age_years)?;
        Ok(())
    }
}

impl Validate for WeightEntry {
    fn validate(&self) -> Result<()> {
        check_positive("weight.weightKg", self.weight_kg)
    }
}
