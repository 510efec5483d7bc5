//! Composite system score and liability/leverage ranking.

use serde::{Deserialize, Serialize};

use vt_common::{DailySnapshot, Metric, Result};
use vt_config::tunables::SystemWeights;
use vt_math::{clamp_score, weighted_geometric_mean};

/// Integer scores for one day, all in `[0, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleScores {
    pub learning: u8,
    pub screen: u8,
    pub nutrition: u8,
    pub training: u8,
    pub sleep: u8,
    pub system: u8,
}

impl ModuleScores {
    pub fn get(&self, metric: Metric) -> u8 {
        match metric {
            Metric::Learning => self.learning,
            Metric::Screen => self.screen,
            Metric::Nutrition => self.nutrition,
            Metric::Training => self.training,
            Metric::Sleep => self.sleep,
            Metric::System => self.system,
        }
    }

    /// The five domain scores in [`Metric::DOMAINS`] order.
    pub fn domains(&self) -> [f64; 5] {
        Metric::DOMAINS.map(|m| f64::from(self.get(m)))
    }

    /// Snapshot holding every score.
    pub fn to_snapshot(
        &self,
        date: chrono::NaiveDate,
        captured_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<DailySnapshot> {
        let mut snapshot = DailySnapshot::new(date, captured_at);
        for metric in Metric::ALL {
            snapshot.set(metric, f64::from(self.get(metric)))?;
        }
        Ok(snapshot)
    }
}

fn weight_for(metric: Metric, weights: &SystemWeights) -> f64 {
    match metric {
        Metric::Learning => weights.learning,
        Metric::Screen => weights.screen,
        Metric::Nutrition => weights.nutrition,
        Metric::Training => weights.training,
        Metric::Sleep => weights.sleep,
        Metric::System => 0.0,
    }
}

/// Weighted geometric mean of the domain scores.
///
/// Scores are floored at 1 inside the log, so one zero domain drags the
/// composite down without zeroing it.
pub fn system_score(domains: &[f64; 5], weights: &SystemWeights) -> f64 {
    let w = Metric::DOMAINS.map(|m| weight_for(m, weights));
    clamp_score(weighted_geometric_mean(domains, &w).unwrap_or(0.0))
}

/// One domain as seen by the insight ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleScore {
    pub id: Metric,
    pub value: f64,
    pub weight: f64,
}

impl ModuleScore {
    /// Weighted headroom `(100 - value) * weight`.
    pub fn leverage(&self) -> f64 {
        (100.0 - self.value) * self.weight
    }
}

/// The limiting domain and the domains ranked by improvement potential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    /// Lowest-scoring domain.
    pub liability: ModuleScore,
    /// Domains by leverage, highest first.
    pub leverage: Vec<ModuleScore>,
}

/// Rank the five domains of `scores`.
///
/// Ties keep domain order, so the result is deterministic.
pub fn build_insight(scores: &ModuleScores, weights: &SystemWeights) -> Insight {
    let modules: Vec<ModuleScore> = Metric::DOMAINS
        .iter()
        .map(|&id| ModuleScore {
            id,
            value: f64::from(scores.get(id)),
            weight: weight_for(id, weights),
        })
        .collect();

    let mut by_value = modules.clone();
    by_value.sort_by(|a, b| a.value.total_cmp(&b.value));
    let liability = by_value[0];

    let mut leverage = modules;
    leverage.sort_by(|a, b| b.leverage().total_cmp(&a.leverage()));

    Insight {
        liability,
        leverage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: [u8; 5]) -> ModuleScores {
        ModuleScores {
            learning: values[0],
            screen: values[1],
            nutrition: values[2],
            training: values[3],
            sleep: values[4],
            system: 0,
        }
    }

    #[test]
    fn equal_scores_give_same_composite() {
        let s = system_score(&[90.0; 5], &SystemWeights::default());
        assert!((s - 90.0).abs() < 1e-9);
    }

    #[test]
    fn zero_domain_drags_but_does_not_zero() {
        let w = SystemWeights::default();
        let healthy = system_score(&[90.0; 5], &w);
        let one_zero = system_score(&[90.0, 90.0, 0.0, 90.0, 90.0], &w);
        assert!(one_zero > 0.0);
        assert!(one_zero < healthy);
    }

    #[test]
    fn insight_ranks_by_weighted_headroom() {
        let w = SystemWeights::default();
        // learning 60 (w 1.2) -> 48; nutrition 55 (w 1.0) -> 45
        let insight = build_insight(&scores([60, 90, 55, 95, 80]), &w);
        assert_eq!(insight.liability.id, Metric::Nutrition);
        assert_eq!(insight.leverage[0].id, Metric::Learning);
        assert_eq!(insight.leverage[1].id, Metric::Nutrition);
        assert_eq!(insight.leverage.len(), 5);
        assert_eq!(insight.leverage[4].id, Metric::Training);
    }

    #[test]
    fn snapshot_carries_all_six_scores() {
        let mut s = scores([1, 2, 3, 4, 5]);
        s.system = 3;
        let date = chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let snap = s.to_snapshot(date, chrono::Utc::now()).unwrap();
        assert_eq!(snap.get(Metric::Sleep), Some(5.0));
        assert_eq!(snap.get(Metric::System), Some(3.0));
    }
}
