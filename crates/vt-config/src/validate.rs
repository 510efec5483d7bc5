//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::tunables::Tunables;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

fn positive(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be > 0, got {}", value),
        });
    }
    Ok(())
}

fn non_negative(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be >= 0, got {}", value),
        });
    }
    Ok(())
}

fn unit_interval(field: &str, value: f64) -> ValidationResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be in [0, 1], got {}", value),
        });
    }
    Ok(())
}

fn at_least(field: &str, value: usize, min: usize) -> ValidationResult<()> {
    if value < min {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be >= {}, got {}", min, value),
        });
    }
    Ok(())
}

/// Validate tunables semantically.
pub fn validate_tunables(t: &Tunables) -> ValidationResult<()> {
    if t.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: t.schema_version.clone(),
        });
    }

    at_least("archive.capacity_days", t.archive.capacity_days, 1)?;

    at_least("baseline.window_days", t.baseline.window_days, 1)?;
    at_least("baseline.min_samples", t.baseline.min_samples, 1)?;
    positive("baseline.fallback_std_dev", t.baseline.fallback_std_dev)?;
    positive("baseline.min_std_dev", t.baseline.min_std_dev)?;

    non_negative("learning.active_multiplier", t.learning.active_multiplier)?;
    positive("learning.logistic_k", t.learning.logistic_k)?;

    non_negative("screen.social_coefficient", t.screen.social_coefficient)?;
    non_negative(
        "screen.entertainment_coefficient",
        t.screen.entertainment_coefficient,
    )?;
    positive("screen.exponent", t.screen.exponent)?;

    let n = &t.nutrition;
    positive("nutrition.macro_sigma", n.macro_sigma)?;
    unit_interval("nutrition.fat_quality_weight", n.fat_quality_weight)?;
    unit_interval("nutrition.amino_weight", n.amino_weight)?;
    unit_interval("nutrition.amino_target_ratio", n.amino_target_ratio)?;
    positive("nutrition.hydration_full_ml", n.hydration_full_ml)?;
    positive("nutrition.hydration_floor", n.hydration_floor)?;
    if n.hydration_floor > n.hydration_ceiling {
        return Err(ValidationError::SemanticError(format!(
            "nutrition.hydration_floor ({}) exceeds hydration_ceiling ({})",
            n.hydration_floor, n.hydration_ceiling
        )));
    }

    positive("training.optimal_volume_kg", t.training.optimal_volume_kg)?;
    positive("training.fatigue_gate_kg", t.training.fatigue_gate_kg)?;

    positive("sleep.target_hours", t.sleep.target_hours)?;
    unit_interval("sleep.duration_weight", t.sleep.duration_weight)?;
    unit_interval("sleep.quality_weight", t.sleep.quality_weight)?;
    non_negative("sleep.nap_bonus_cap", t.sleep.nap_bonus_cap)?;

    let w = &t.system;
    for (field, value) in [
        ("system.learning", w.learning),
        ("system.screen", w.screen),
        ("system.nutrition", w.nutrition),
        ("system.training", w.training),
        ("system.sleep", w.sleep),
    ] {
        positive(field, value)?;
    }

    let i = &t.imputation;
    at_least("imputation.window_days", i.window_days, 1)?;
    at_least("imputation.min_history", i.min_history, 1)?;
    at_least("imputation.min_same_weekday", i.min_same_weekday, 1)?;
    positive("imputation.min_variance", i.min_variance)?;

    let c = &t.correlation;
    at_least("correlation.window_days", c.window_days, 1)?;
    at_least("correlation.min_regression_cases", c.min_regression_cases, 3)?;
    unit_interval("correlation.strong_threshold", c.strong_threshold)?;
    unit_interval("correlation.moderate_threshold", c.moderate_threshold)?;
    if c.moderate_threshold > c.strong_threshold {
        return Err(ValidationError::SemanticError(format!(
            "correlation.moderate_threshold ({}) exceeds strong_threshold ({})",
            c.moderate_threshold, c.strong_threshold
        )));
    }
    positive("correlation.min_std_dev", c.min_std_dev)?;

    let f = &t.forecast;
    at_least("forecast.window_days", f.window_days, 2)?;
    at_least("forecast.min_points", f.min_points, 2)?;
    at_least("forecast.horizon_days", f.horizon_days, 1)?;
    non_negative("forecast.trend_threshold", f.trend_threshold)?;
    positive("forecast.confidence_decay_days", f.confidence_decay_days)?;
    at_least("forecast.full_confidence_points", f.full_confidence_points, 1)?;

    let g = &t.targets;
    at_least("targets.min_points", g.min_points, 2)?;
    non_negative("targets.trend_threshold_kg", g.trend_threshold_kg)?;
    positive("targets.deficit_factor", g.deficit_factor)?;
    positive("targets.maintenance_factor", g.maintenance_factor)?;
    positive("targets.surplus_factor", g.surplus_factor)?;
    non_negative("targets.protein_g_per_kg", g.protein_g_per_kg)?;
    unit_interval("targets.fat_share", g.fat_share)?;

    Ok(())
}
