//! Per-domain scoring formulas for learning, screen, training and sleep.
//!
//! Each function maps one day's log onto `[0, 100]`. Nutrition lives in its
//! own module because it blends several sub-scores.

use serde::{Deserialize, Serialize};

use crate::baseline::Baseline;
use vt_common::{LearningLog, ScreenLog, SleepLog, TrainingLog};
use vt_config::tunables::{LearningParams, ScreenParams, SleepParams, TrainingParams};
use vt_math::{clamp_score, logistic};

// ============================================================================
// Learning
// ============================================================================

/// Active minutes count `active_multiplier` times as much as passive ones.
pub fn effective_load(log: &LearningLog, params: &LearningParams) -> f64 {
    log.active * params.active_multiplier + log.passive
}

/// Logistic saturation of today's load against the learning baseline.
///
/// With an insufficient baseline z is 0, so the score sits at
/// `logistic(0, k, c)` regardless of minutes logged.
pub fn learning_score(log: &LearningLog, baseline: &Baseline, params: &LearningParams) -> f64 {
    let z = baseline.z_score(effective_load(log, params));
    let p = logistic(z, params.logistic_k, params.logistic_c);
    clamp_score((p * 100.0).round())
}

// ============================================================================
// Screen
// ============================================================================

/// Superlinear penalty for social and entertainment minutes.
pub fn screen_penalty(log: &ScreenLog, params: &ScreenParams) -> f64 {
    params.social_coefficient * log.social.powf(params.exponent)
        + params.entertainment_coefficient * log.entertainment.powf(params.exponent)
}

pub fn screen_score(log: &ScreenLog, params: &ScreenParams) -> f64 {
    clamp_score(100.0 - screen_penalty(log, params) + params.productive_credit * log.productive)
}

// ============================================================================
// Training
// ============================================================================

/// Quadratic fatigue factor anchored at `optimal`.
///
/// Exactly 1 at or below `optimal`; reaches 0 at twice the optimum.
pub fn fatigue_penalty(volume: f64, optimal: f64) -> f64 {
    if volume <= optimal || optimal <= 0.0 {
        return 1.0;
    }
    let excess = volume - optimal;
    (1.0 - (excess * excess) / (optimal * optimal)).max(0.0)
}

/// Volume as a percentage of the optimum, before fatigue.
pub fn training_ratio(volume: f64, params: &TrainingParams) -> f64 {
    clamp_score(volume / params.optimal_volume_kg * 100.0)
}

/// Training score. The fatigue factor only applies past the gate, even
/// though its curve is anchored at the optimum.
pub fn training_score(log: &TrainingLog, params: &TrainingParams) -> f64 {
    let volume = log.total_volume_kg;
    let ratio = training_ratio(volume, params);
    if volume > params.fatigue_gate_kg {
        clamp_score(ratio * fatigue_penalty(volume, params.optimal_volume_kg))
    } else {
        ratio
    }
}

// ============================================================================
// Sleep
// ============================================================================

/// Sleep sub-scores, exposed for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepBreakdown {
    pub duration_score: f64,
    pub quality_score: f64,
    pub nap_bonus: f64,
    pub score: f64,
}

pub fn sleep_breakdown(log: &SleepLog, params: &SleepParams) -> SleepBreakdown {
    let duration_score =
        clamp_score(100.0 - (params.target_hours - log.duration_hours) * params.hour_penalty);
    let quality_score = log.quality_score / 10.0 * 100.0;
    let nap_bonus = (log.nap_minutes / 60.0 * params.nap_points_per_hour).min(params.nap_bonus_cap);
    let score = clamp_score(
        (params.duration_weight * duration_score + params.quality_weight * quality_score + nap_bonus)
            .round(),
    );
    SleepBreakdown {
        duration_score,
        quality_score,
        nap_bonus,
        score,
    }
}

pub fn sleep_score(log: &SleepLog, params: &SleepParams) -> f64 {
    sleep_breakdown(log, params).score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn learning_neutral_without_history() {
        let params = LearningParams::default();
        let baseline = Baseline::fallback(0, &Default::default());
        let log = LearningLog {
            active: 120.0,
            passive: 60.0,
        };
        // logistic(0, 0.8, 0.5) = 1 / (1 + e^0.4) ≈ 0.401
        assert_eq!(learning_score(&log, &baseline, &params), 40.0);
    }

    #[test]
    fn learning_rises_with_load() {
        let params = LearningParams::default();
        let baseline = Baseline::computed(60.0, 20.0, 14);
        let light = LearningLog {
            active: 0.0,
            passive: 30.0,
        };
        let heavy = LearningLog {
            active: 90.0,
            passive: 30.0,
        };
        assert_eq!(effective_load(&heavy, &params), 165.0);
        assert!(learning_score(&heavy, &baseline, &params) > learning_score(&light, &baseline, &params));
        assert!(learning_score(&heavy, &baseline, &params) <= 100.0);
    }

    #[test]
    fn screen_penalties() {
        let params = ScreenParams::default();
        assert_eq!(screen_score(&ScreenLog::default(), &params), 100.0);

        let doom = ScreenLog {
            social: 240.0,
            entertainment: 240.0,
            productive: 0.0,
        };
        assert_eq!(screen_score(&doom, &params), 0.0);

        let light = ScreenLog {
            social: 10.0,
            entertainment: 0.0,
            productive: 60.0,
        };
        let expected = 100.0 - 0.015 * 10f64.powf(1.8) + 6.0;
        assert!(approx(screen_score(&light, &params), expected.min(100.0), 1e-9));
    }

    #[test]
    fn fatigue_penalty_values() {
        assert_eq!(fatigue_penalty(0.0, 10_000.0), 1.0);
        assert_eq!(fatigue_penalty(10_000.0, 10_000.0), 1.0);
        assert!(approx(fatigue_penalty(12_000.0, 10_000.0), 0.96, 1e-12));
        assert_eq!(fatigue_penalty(25_000.0, 10_000.0), 0.0);
    }

    #[test]
    fn training_gate_is_independent_of_anchor() {
        let params = TrainingParams::default();
        // Past the anchor but below the gate: no fatigue applied.
        let mid = TrainingLog {
            total_volume_kg: 12_000.0,
        };
        assert_eq!(training_score(&mid, &params), 100.0);

        // Past the gate: 100 * (1 - 0.25) = 75.
        let heavy = TrainingLog {
            total_volume_kg: 15_000.0 + 1e-9,
        };
        assert!(approx(training_score(&heavy, &params), 75.0, 1e-6));

        let half = TrainingLog {
            total_volume_kg: 5_000.0,
        };
        assert_eq!(training_score(&half, &params), 50.0);
    }

    #[test]
    fn sleep_perfect_night() {
        let log = SleepLog {
            duration_hours: 8.0,
            quality_score: 10.0,
            nap_minutes: 0.0,
        };
        let b = sleep_breakdown(&log, &SleepParams::default());
        assert_eq!(b.duration_score, 100.0);
        assert_eq!(b.quality_score, 100.0);
        assert_eq!(b.score, 100.0);
    }

    #[test]
    fn sleep_short_night_with_nap() {
        let log = SleepLog {
            duration_hours: 6.0,
            quality_score: 5.0,
            nap_minutes: 30.0,
        };
        let b = sleep_breakdown(&log, &SleepParams::default());
        assert_eq!(b.duration_score, 70.0);
        assert_eq!(b.quality_score, 50.0);
        assert_eq!(b.nap_bonus, 7.5);
        assert_eq!(b.score, 72.0);
    }

    #[test]
    fn sleep_nap_bonus_caps() {
        let log = SleepLog {
            duration_hours: 0.0,
            quality_score: 0.0,
            nap_minutes: 600.0,
        };
        let b = sleep_breakdown(&log, &SleepParams::default());
        assert_eq!(b.nap_bonus, 20.0);
        assert_eq!(b.score, 20.0);
    }
}
