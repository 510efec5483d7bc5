//! Daily score snapshots, the unit of the rolling archive.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metric::Metric;

/// Scores captured for one calendar date.
///
/// Every present score lies in `[0, 100]`; absent means "not recorded".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySnapshot {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<f64>,
    pub captured_at: DateTime<Utc>,
}

impl DailySnapshot {
    /// An empty snapshot for `date`.
    pub fn new(date: NaiveDate, captured_at: DateTime<Utc>) -> Self {
        Self {
            date,
            learning: None,
            screen: None,
            nutrition: None,
            training: None,
            sleep: None,
            system: None,
            captured_at,
        }
    }

    /// Score recorded for `metric`, if any.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Learning => self.learning,
            Metric::Screen => self.screen,
            Metric::Nutrition => self.nutrition,
            Metric::Training => self.training,
            Metric::Sleep => self.sleep,
            Metric::System => self.system,
        }
    }

    /// Record a score for `metric`.
    ///
    /// Non-finite or out-of-range values are rejected so the archive never
    /// holds NaN or negative scores.
    pub fn set(&mut self, metric: Metric, value: f64) -> Result<()> {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(Error::invalid(
                metric.as_str(),
                format!("score must be within 0..=100, got {}", value),
            ));
        }
        let slot = match metric {
            Metric::Learning => &mut self.learning,
            Metric::Screen => &mut self.screen,
            Metric::Nutrition => &mut self.nutrition,
            Metric::Training => &mut self.training,
            Metric::Sleep => &mut self.sleep,
            Metric::System => &mut self.system,
        };
        *slot = Some(value);
        Ok(())
    }

    /// Builder form of [`DailySnapshot::set`].
    pub fn with(mut self, metric: Metric, value: f64) -> Result<Self> {
        self.set(metric, value)?;
        Ok(self)
    }

    /// Check the score-range invariant for every field.
    pub fn validate(&self) -> Result<()> {
        for metric in Metric::ALL {
            if let Some(v) = self.get(metric) {
                if !v.is_finite() || !(0.0..=100.0).contains(&v) {
                    return Err(Error::invalid(
                        format!("{}.{}", self.date, metric),
                        format!("score must be within 0..=100, got {}", v),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Whether any score is recorded.
    pub fn is_empty(&self) -> bool {
        Metric::ALL.iter().all(|m| self.get(*m).is_none())
    }
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| Error::InvalidDate(format!("{}: {}", raw, e)))
}
