//! Scoring and inference tunables.
//!
//! Every constant the engine uses lives here with its default. Each section
//! is `#[serde(default)]`, so a tunables file only needs the fields it
//! overrides.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// Complete tunables configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Tunables {
    pub schema_version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub archive: ArchiveParams,
    pub baseline: BaselineParams,
    pub learning: LearningParams,
    pub screen: ScreenParams,
    pub nutrition: NutritionParams,
    pub training: TrainingParams,
    pub sleep: SleepParams,
    pub system: SystemWeights,
    pub imputation: ImputationParams,
    pub correlation: CorrelationParams,
    pub forecast: ForecastParams,
    pub targets: TargetParams,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            description: None,
            archive: ArchiveParams::default(),
            baseline: BaselineParams::default(),
            learning: LearningParams::default(),
            screen: ScreenParams::default(),
            nutrition: NutritionParams::default(),
            training: TrainingParams::default(),
            sleep: SleepParams::default(),
            system: SystemWeights::default(),
            imputation: ImputationParams::default(),
            correlation: CorrelationParams::default(),
            forecast: ForecastParams::default(),
            targets: TargetParams::default(),
        }
    }
}

impl Tunables {
    /// Load tunables from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Parse tunables from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }
}

/// Rolling archive size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ArchiveParams {
    /// Most recent dates retained; older entries are evicted on insert.
    pub capacity_days: usize,
}

impl Default for ArchiveParams {
    fn default() -> Self {
        Self { capacity_days: 30 }
    }
}

/// Trailing-window baseline estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BaselineParams {
    pub window_days: usize,
    /// Below this many samples the neutral fallback is returned.
    pub min_samples: usize,
    pub fallback_mean: f64,
    pub fallback_std_dev: f64,
    /// Floor applied to every computed standard deviation.
    pub min_std_dev: f64,
}

impl Default for BaselineParams {
    fn default() -> Self {
        Self {
            window_days: 14,
            min_samples: 3,
            fallback_mean: 50.0,
            fallback_std_dev: 15.0,
            min_std_dev: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LearningParams {
    /// Weight of active minutes relative to passive minutes.
    pub active_multiplier: f64,
    /// Logistic steepness.
    pub logistic_k: f64,
    /// Logistic midpoint, in z units.
    pub logistic_c: f64,
}

impl Default for LearningParams {
    fn default() -> Self {
        Self {
            active_multiplier: 1.5,
            logistic_k: 0.8,
            logistic_c: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScreenParams {
    pub social_coefficient: f64,
    pub entertainment_coefficient: f64,
    /// Exponent applied to social and entertainment minutes.
    pub exponent: f64,
    /// Points credited per productive minute.
    pub productive_credit: f64,
}

impl Default for ScreenParams {
    fn default() -> Self {
        Self {
            social_coefficient: 0.015,
            entertainment_coefficient: 0.02,
            exponent: 1.8,
            productive_credit: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NutritionParams {
    /// Decay constant σ of the macro-distance score, in grams.
    pub macro_sigma: f64,
    pub fat_quality_weight: f64,
    pub trans_fat_decay: f64,
    pub amino_weight: f64,
    /// Ideal essential-to-total amino acid ratio.
    pub amino_target_ratio: f64,
    pub amino_decay: f64,
    pub junk_exponent: f64,
    pub junk_scale: f64,
    /// Hydration at which the multiplier reaches its ceiling.
    pub hydration_full_ml: f64,
    pub hydration_floor: f64,
    pub hydration_ceiling: f64,
}

impl Default for NutritionParams {
    fn default() -> Self {
        Self {
            macro_sigma: 50.0,
            fat_quality_weight: 0.15,
            trans_fat_decay: 0.5,
            amino_weight: 0.10,
            amino_target_ratio: 0.45,
            amino_decay: 10.0,
            junk_exponent: 2.0,
            junk_scale: 30.0,
            hydration_full_ml: 3000.0,
            hydration_floor: 0.9,
            hydration_ceiling: 1.05,
        }
    }
}

/// Training volume thresholds. The curve anchor and the fatigue gate are
/// independent: the penalty curve is centered on the anchor but only
/// applies once volume passes the gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TrainingParams {
    pub optimal_volume_kg: f64,
    pub fatigue_gate_kg: f64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            optimal_volume_kg: 10_000.0,
            fatigue_gate_kg: 15_000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SleepParams {
    pub target_hours: f64,
    /// Points lost per hour short of target.
    pub hour_penalty: f64,
    pub duration_weight: f64,
    pub quality_weight: f64,
    pub nap_points_per_hour: f64,
    pub nap_bonus_cap: f64,
}

impl Default for SleepParams {
    fn default() -> Self {
        Self {
            target_hours: 8.0,
            hour_penalty: 15.0,
            duration_weight: 0.7,
            quality_weight: 0.3,
            nap_points_per_hour: 15.0,
            nap_bonus_cap: 20.0,
        }
    }
}

/// Per-domain weights of the system score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SystemWeights {
    pub learning: f64,
    pub screen: f64,
    pub nutrition: f64,
    pub training: f64,
    pub sleep: f64,
}

impl Default for SystemWeights {
    fn default() -> Self {
        Self {
            learning: 1.2,
            screen: 1.1,
            nutrition: 1.0,
            training: 1.0,
            sleep: 1.2,
        }
    }
}

impl SystemWeights {
    /// Weights in domain order: learning, screen, nutrition, training, sleep.
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.learning,
            self.screen,
            self.nutrition,
            self.training,
            self.sleep,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ImputationParams {
    pub window_days: usize,
    /// Below this many points the population mean is returned.
    pub min_history: usize,
    /// Same-weekday points needed to form a likelihood.
    pub min_same_weekday: usize,
    pub high_confidence_same_weekday: usize,
    pub medium_confidence_history: usize,
    pub low_confidence_history: usize,
    pub population_mean: f64,
    /// Spread reported alongside the population-mean fallback.
    pub population_std_dev: f64,
    pub min_variance: f64,
}

impl Default for ImputationParams {
    fn default() -> Self {
        Self {
            window_days: 30,
            min_history: 3,
            min_same_weekday: 2,
            high_confidence_same_weekday: 3,
            medium_confidence_history: 14,
            low_confidence_history: 7,
            population_mean: 50.0,
            population_std_dev: 15.0,
            min_variance: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CorrelationParams {
    pub window_days: usize,
    pub min_regression_cases: usize,
    pub top_pairs: usize,
    /// |r| at or above which a pair is labelled strong.
    pub strong_threshold: f64,
    /// |r| at or above which a pair is labelled moderate.
    pub moderate_threshold: f64,
    pub min_std_dev: f64,
}

impl Default for CorrelationParams {
    fn default() -> Self {
        Self {
            window_days: 30,
            min_regression_cases: 10,
            top_pairs: 5,
            strong_threshold: 0.7,
            moderate_threshold: 0.4,
            min_std_dev: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ForecastParams {
    pub window_days: usize,
    pub min_points: usize,
    pub horizon_days: usize,
    /// |slope| above which a trend is improving/declining.
    pub trend_threshold: f64,
    /// e-folding distance of confidence, in days.
    pub confidence_decay_days: f64,
    /// History length that earns full base confidence.
    pub full_confidence_points: usize,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            window_days: 30,
            min_points: 7,
            horizon_days: 7,
            trend_threshold: 0.5,
            confidence_decay_days: 7.0,
            full_confidence_points: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TargetParams {
    pub min_points: usize,
    /// kg/day beyond which weight is trending.
    pub trend_threshold_kg: f64,
    pub deficit_factor: f64,
    pub maintenance_factor: f64,
    pub surplus_factor: f64,
    pub protein_g_per_kg: f64,
    /// Share of calories from fat.
    pub fat_share: f64,
}

impl Default for TargetParams {
    fn default() -> Self {
        Self {
            min_points: 3,
            trend_threshold_kg: 0.1,
            deficit_factor: 1.35,
            maintenance_factor: 1.55,
            surplus_factor: 1.65,
            protein_g_per_kg: 2.2,
            fat_share: 0.25,
        }
    }
}
