//! Rolling archive of daily score snapshots.
//!
//! The store keeps at most `capacity` of the most recent dates. It is the
//! only mutable state in the engine; every estimator reads from it and
//! none of them write back.

pub mod backend;

pub use backend::{Archive, ArchiveBackend, JsonFileBackend, MemoryBackend};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::logging::{event_names, Stage};
use vt_common::{DailySnapshot, Error, Metric, Result};

/// Default number of dates retained.
pub const DEFAULT_CAPACITY: usize = 30;

/// One dated value of a single metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// One calendar day of a range read; `snapshot` is `None` for days with no
/// archived entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    pub date: NaiveDate,
    pub snapshot: Option<DailySnapshot>,
}

/// Size-bounded snapshot archive over an injected backend.
pub struct TimeSeriesStore {
    backend: Box<dyn ArchiveBackend>,
    entries: Archive,
    capacity: usize,
}

impl std::fmt::Debug for TimeSeriesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeSeriesStore")
            .field("backend", &self.backend.describe())
            .field("entries", &self.entries.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl TimeSeriesStore {
    /// Load the archive from `backend`.
    ///
    /// Entries that violate the score range are rejected. An archive larger
    /// than `capacity` is trimmed in memory; the backend is rewritten on the
    /// next [`store`](Self::store).
    pub fn open(backend: Box<dyn ArchiveBackend>, capacity: usize) -> Result<Self> {
        let capacity = capacity.max(1);
        let mut entries = backend.load()?;
        for (date, snapshot) in entries.iter_mut() {
            snapshot
                .validate()
                .map_err(|e| Error::Storage(format!("archived entry {}: {}", date, e)))?;
            snapshot.date = *date;
        }
        let evicted = evict_oldest(&mut entries, capacity);

        debug!(
            event = event_names::STORE_OPENED,
            stage = %Stage::Store,
            backend = %backend.describe(),
            entries = entries.len(),
            evicted = evicted.len(),
            "archive opened"
        );

        Ok(Self {
            backend,
            entries,
            capacity,
        })
    }

    /// An empty in-memory store.
    pub fn in_memory(capacity: usize) -> Self {
        Self {
            backend: Box::new(MemoryBackend::new()),
            entries: Archive::new(),
            capacity: capacity.max(1),
        }
    }

    /// Upsert the snapshot for `date`, evicting the oldest dates beyond
    /// capacity. Returns the evicted dates.
    ///
    /// The snapshot is keyed by `date`; its own `date` field is overwritten
    /// to match. Nothing changes in memory if the backend write fails.
    pub fn store(&mut self, date: NaiveDate, mut snapshot: DailySnapshot) -> Result<Vec<NaiveDate>> {
        snapshot.validate()?;
        snapshot.date = date;

        let mut next = self.entries.clone();
        let replaced = next.insert(date, snapshot).is_some();
        let evicted = evict_oldest(&mut next, self.capacity);

        self.backend.save(&next)?;
        self.entries = next;

        debug!(
            event = event_names::STORE_UPSERTED,
            stage = %Stage::Store,
            %date,
            replaced,
            entries = self.entries.len(),
            "snapshot stored"
        );
        if !evicted.is_empty() {
            info!(
                event = event_names::STORE_EVICTED,
                stage = %Stage::Store,
                count = evicted.len(),
                oldest_kept = ?self.entries.keys().next(),
                "evicted snapshots beyond capacity"
            );
        }
        Ok(evicted)
    }

    /// Every archived snapshot, oldest first.
    pub fn read_all(&self) -> &Archive {
        &self.entries
    }

    /// Snapshot for one date.
    pub fn get(&self, date: NaiveDate) -> Option<&DailySnapshot> {
        self.entries.get(&date)
    }

    /// The last `days` archived snapshots, oldest first.
    pub fn recent(&self, days: usize) -> impl Iterator<Item = &DailySnapshot> + '_ {
        let skip = self.entries.len().saturating_sub(days);
        self.entries.values().skip(skip)
    }

    /// Values of `metric` over the last `days` archived dates, oldest first.
    ///
    /// Dates without that metric are skipped, so the result may be shorter
    /// than `days`.
    pub fn read_metric(&self, metric: Metric, days: usize) -> Vec<MetricPoint> {
        collect_metric(self.recent(days), metric)
    }

    /// Like [`read_metric`](Self::read_metric), restricted to dates strictly
    /// before `before`.
    pub fn read_metric_before(
        &self,
        metric: Metric,
        days: usize,
        before: NaiveDate,
    ) -> Vec<MetricPoint> {
        let prior: Vec<&DailySnapshot> = self.entries.range(..before).map(|(_, s)| s).collect();
        let skip = prior.len().saturating_sub(days);
        collect_metric(prior.into_iter().skip(skip), metric)
    }

    /// The `days` calendar dates ending at `end` (inclusive), oldest first,
    /// with `None` for dates that have no snapshot.
    pub fn read_range(&self, days: usize, end: NaiveDate) -> Vec<DayRecord> {
        let mut records = Vec::with_capacity(days);
        for back in (0..days as u64).rev() {
            let Some(date) = end.checked_sub_days(Days::new(back)) else {
                continue;
            };
            records.push(DayRecord {
                date,
                snapshot: self.entries.get(&date).cloned(),
            });
        }
        records
    }

    /// Most recent archived date.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.entries.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn collect_metric<'a>(
    snapshots: impl Iterator<Item = &'a DailySnapshot>,
    metric: Metric,
) -> Vec<MetricPoint> {
    snapshots
        .filter_map(|s| {
            s.get(metric).map(|value| MetricPoint {
                date: s.date,
                value,
            })
        })
        .collect()
}

fn evict_oldest(entries: &mut Archive, capacity: usize) -> Vec<NaiveDate> {
    let mut evicted = Vec::new();
    while entries.len() > capacity {
        match entries.pop_first() {
            Some((date, _)) => evicted.push(date),
            None => break,
        }
    }
    evicted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap() + Days::new(u64::from(day))
    }

    fn snap(day: u32, sleep: Option<f64>) -> DailySnapshot {
        let mut s = DailySnapshot::new(date(day), Utc::now());
        if let Some(v) = sleep {
            s.set(Metric::Sleep, v).unwrap();
        }
        s.set(Metric::System, 50.0).unwrap();
        s
    }

    #[test]
    fn empty_store_reads_are_empty() {
        let store = TimeSeriesStore::in_memory(DEFAULT_CAPACITY);
        assert!(store.read_all().is_empty());
        assert!(store.read_metric(Metric::Sleep, 14).is_empty());
        assert_eq!(store.latest_date(), None);
        let range = store.read_range(3, date(0));
        assert_eq!(range.len(), 3);
        assert!(range.iter().all(|r| r.snapshot.is_none()));
    }

    #[test]
    fn store_then_read_all_round_trips() {
        let mut store = TimeSeriesStore::in_memory(DEFAULT_CAPACITY);
        let s = snap(0, Some(72.0));
        store.store(date(0), s.clone()).unwrap();
        assert_eq!(store.read_all().get(&date(0)), Some(&s));
    }

    #[test]
    fn upsert_overwrites_same_date() {
        let mut store = TimeSeriesStore::in_memory(DEFAULT_CAPACITY);
        store.store(date(0), snap(0, Some(60.0))).unwrap();
        store.store(date(0), snap(0, Some(90.0))).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(date(0)).unwrap().sleep, Some(90.0));
    }

    #[test]
    fn key_date_wins_over_snapshot_date() {
        let mut store = TimeSeriesStore::in_memory(DEFAULT_CAPACITY);
        store.store(date(5), snap(0, Some(60.0))).unwrap();
        assert_eq!(store.get(date(5)).unwrap().date, date(5));
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let mut store = TimeSeriesStore::in_memory(30);
        for day in 0..30 {
            assert!(store.store(date(day), snap(day, Some(70.0))).unwrap().is_empty());
        }
        let evicted = store.store(date(30), snap(30, Some(70.0))).unwrap();
        assert_eq!(evicted, vec![date(0)]);
        assert_eq!(store.len(), 30);
        assert_eq!(store.read_all().keys().next(), Some(&date(1)));
    }

    #[test]
    fn backfilling_an_old_date_past_capacity_is_evicted_immediately() {
        let mut store = TimeSeriesStore::in_memory(2);
        store.store(date(5), snap(5, None)).unwrap();
        store.store(date(6), snap(6, None)).unwrap();
        let evicted = store.store(date(1), snap(1, None)).unwrap();
        assert_eq!(evicted, vec![date(1)]);
        assert!(store.get(date(1)).is_none());
    }

    #[test]
    fn read_metric_windows_over_archived_dates_and_skips_missing() {
        let mut store = TimeSeriesStore::in_memory(DEFAULT_CAPACITY);
        store.store(date(0), snap(0, Some(10.0))).unwrap();
        store.store(date(1), snap(1, None)).unwrap();
        store.store(date(2), snap(2, Some(30.0))).unwrap();
        store.store(date(9), snap(9, Some(40.0))).unwrap();

        let last3 = store.read_metric(Metric::Sleep, 3);
        let values: Vec<f64> = last3.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![30.0, 40.0]);
        assert_eq!(last3[0].date, date(2));

        assert_eq!(store.read_metric(Metric::Sleep, 100).len(), 3);
        assert!(store.read_metric(Metric::Sleep, 0).is_empty());
    }

    #[test]
    fn read_metric_before_excludes_the_day_itself() {
        let mut store = TimeSeriesStore::in_memory(DEFAULT_CAPACITY);
        for day in 0..5 {
            store
                .store(date(day), snap(day, Some(f64::from(day) * 10.0)))
                .unwrap();
        }
        let points = store.read_metric_before(Metric::Sleep, 2, date(4));
        let values: Vec<f64> = points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![20.0, 30.0]);
    }

    #[test]
    fn read_range_has_placeholders() {
        let mut store = TimeSeriesStore::in_memory(DEFAULT_CAPACITY);
        store.store(date(0), snap(0, Some(10.0))).unwrap();
        store.store(date(2), snap(2, Some(30.0))).unwrap();

        let range = store.read_range(4, date(2));
        let dates: Vec<NaiveDate> = range.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(0) - Days::new(1), date(0), date(1), date(2)]);
        assert!(range[0].snapshot.is_none());
        assert!(range[1].snapshot.is_some());
        assert!(range[2].snapshot.is_none());
        assert!(range[3].snapshot.is_some());
    }

    #[test]
    fn rejects_invalid_snapshot() {
        let mut store = TimeSeriesStore::in_memory(DEFAULT_CAPACITY);
        let mut bad = snap(0, None);
        bad.sleep = Some(150.0);
        assert!(store.store(date(0), bad).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn open_trims_oversized_archive() {
        let mut archive = Archive::new();
        for day in 0..5 {
            archive.insert(date(day), snap(day, Some(50.0)));
        }
        let store =
            TimeSeriesStore::open(Box::new(MemoryBackend::with_archive(archive)), 3).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.read_all().keys().next(), Some(&date(2)));
    }
}
