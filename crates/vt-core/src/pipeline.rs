//! Ingestion: score a day and archive its snapshot.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::scoring::{score_day, DayScore};
use crate::store::TimeSeriesStore;
use vt_common::{DailyLogs, DailySnapshot, Result, UserProfile, WeightEntry};
use vt_config::Tunables;

/// Result of ingesting one day.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestOutcome {
    pub day: DayScore,
    pub snapshot: DailySnapshot,
    /// Dates dropped from the archive to stay within capacity.
    pub evicted: Vec<NaiveDate>,
}

/// Score `logs` for `date` and upsert the resulting snapshot.
///
/// Re-ingesting the same date replaces its snapshot. Nothing is written if
/// scoring fails.
pub fn ingest_day(
    store: &mut TimeSeriesStore,
    date: NaiveDate,
    logs: &DailyLogs,
    profile: &UserProfile,
    weight_history: &[WeightEntry],
    tunables: &Tunables,
    captured_at: DateTime<Utc>,
) -> Result<IngestOutcome> {
    let day = score_day(date, logs, profile, weight_history, store, tunables)?;
    let snapshot = day.scores.to_snapshot(date, captured_at)?;
    let evicted = store.store(date, snapshot.clone())?;
    Ok(IngestOutcome {
        day,
        snapshot,
        evicted,
    })
}
