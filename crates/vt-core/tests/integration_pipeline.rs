//! End-to-end pipeline tests: ingest days into a file-backed archive, then
//! run the estimators over it.

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use tempfile::TempDir;
use vt_common::{
    DailyLogs, Gender, LearningLog, Metric, ScreenLog, SleepLog, TrainingLog, UserProfile,
    WeightEntry,
};
use vt_config::Tunables;
use vt_core::baseline::calculate_baseline;
use vt_core::correlation::{
    find_strongest_correlations, generate_correlation_matrix, multi_variate_regression,
};
use vt_core::forecast::{calculate_goal_probability, forecast_metric, Trend};
use vt_core::impute::{fill_gaps, impute_missing_score, ImputationConfidence};
use vt_core::pipeline::ingest_day;
use vt_core::store::{JsonFileBackend, TimeSeriesStore};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 2).unwrap()
}

fn captured(day: u64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 2, 21, 0, 0).unwrap() + chrono::Duration::days(day as i64)
}

fn profile() -> UserProfile {
    UserProfile {
        weight_kg: 68.0,
        height_cm: 172.0,
        age_years: 29.0,
        gender: Gender::Female,
    }
}

/// Sleep improves steadily; screen time falls with it.
fn logs_for(day: u64) -> DailyLogs {
    let d = day as f64;
    DailyLogs {
        learning: LearningLog {
            active: 30.0 + 5.0 * d,
            passive: 20.0,
        },
        screen: ScreenLog {
            social: (40.0 - 2.0 * d).max(0.0),
            entertainment: 10.0,
            productive: 30.0,
        },
        training: TrainingLog {
            total_volume_kg: 6_000.0 + 200.0 * d,
        },
        sleep: SleepLog {
            duration_hours: (5.0 + 0.15 * d).min(8.0),
            quality_score: 6.0,
            nap_minutes: 0.0,
        },
        ..Default::default()
    }
}

fn open(dir: &TempDir) -> TimeSeriesStore {
    let backend = JsonFileBackend::new(dir.path().join("archive.json"));
    TimeSeriesStore::open(Box::new(backend), 30).unwrap()
}

fn ingest_days(store: &mut TimeSeriesStore, days: u64) {
    let tunables = Tunables::default();
    for day in 0..days {
        ingest_day(
            store,
            start() + Days::new(day),
            &logs_for(day),
            &profile(),
            &[],
            &tunables,
            captured(day),
        )
        .unwrap();
    }
}

#[test]
fn archive_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = open(&dir);
        ingest_days(&mut store, 12);
    }
    let store = open(&dir);
    assert_eq!(store.len(), 12);
    assert_eq!(store.latest_date(), Some(start() + Days::new(11)));
    let sleep = store.read_metric(Metric::Sleep, 30);
    assert_eq!(sleep.len(), 12);
    assert!(sleep.last().unwrap().value > sleep.first().unwrap().value);
}

#[test]
fn capacity_evicts_oldest_across_reopen() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    ingest_days(&mut store, 35);
    assert_eq!(store.len(), 30);
    assert!(store.get(start()).is_none());
    assert!(store.get(start() + Days::new(5)).is_some());

    let reopened = open(&dir);
    assert_eq!(reopened.len(), 30);
}

#[test]
fn estimators_over_a_growing_archive() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    let tunables = Tunables::default();

    ingest_days(&mut store, 5);
    assert!(forecast_metric(&store, Metric::Sleep, 7, &tunables.forecast).is_err());
    assert!(multi_variate_regression(
        &store,
        Metric::System,
        &[Metric::Sleep],
        &tunables.correlation
    )
    .is_err());

    ingest_days(&mut store, 14);
    let baseline = calculate_baseline(&store, Metric::Sleep, 14, &tunables.baseline);
    assert!(baseline.sufficient);
    assert_eq!(baseline.sample_count, 14);

    let forecast = forecast_metric(&store, Metric::Sleep, 7, &tunables.forecast).unwrap();
    assert_eq!(forecast.trend, Trend::Improving);
    assert_eq!(forecast.points().count(), 7);

    let matrix = generate_correlation_matrix(&store, 30);
    assert!(matrix.get(Metric::Sleep, Metric::Screen) > 0.5);
    let strongest = find_strongest_correlations(&matrix, &tunables.correlation);
    assert_eq!(strongest.len(), 5);

    let regression = multi_variate_regression(
        &store,
        Metric::System,
        &[Metric::Sleep, Metric::Screen, Metric::Training],
        &tunables.correlation,
    )
    .unwrap();
    assert_eq!(regression.sample_size, 14);
    assert_eq!(regression.predictors.len(), 3);

    let goal =
        calculate_goal_probability(&store, Metric::Sleep, 100.0, 14, &tunables.forecast).unwrap();
    assert!((0.0..=100.0).contains(&goal.probability));
}

#[test]
fn imputation_fills_a_skipped_day() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    let tunables = Tunables::default();
    for day in (0..14).filter(|d| *d != 9) {
        ingest_day(
            &mut store,
            start() + Days::new(day),
            &logs_for(day),
            &profile(),
            &[],
            &tunables,
            captured(day),
        )
        .unwrap();
    }

    let missing = start() + Days::new(9);
    let imputed = impute_missing_score(&store, Metric::Sleep, missing, &tunables.imputation);
    assert_eq!(imputed.history_points, 13);
    assert!(imputed.confidence >= ImputationConfidence::Low);

    let observed = store.read_metric(Metric::Sleep, 30);
    let filled = fill_gaps(&observed, Metric::Sleep, &store, &tunables.imputation);
    assert_eq!(filled.len(), 14);
    let gap: Vec<_> = filled.iter().filter(|p| p.is_imputed).collect();
    assert_eq!(gap.len(), 1);
    assert_eq!(gap[0].date, missing);
    assert_eq!(gap[0].value, imputed.value);
}

#[test]
fn weight_history_shapes_nutrition_targets() {
    let store = TimeSeriesStore::in_memory(30);
    let tunables = Tunables::default();
    let gaining: Vec<WeightEntry> = (0..7)
        .map(|i| WeightEntry {
            date: start() + Days::new(i),
            weight_kg: 68.0 + 0.3 * i as f64,
        })
        .collect();
    let day = vt_core::scoring::score_day(
        start() + Days::new(7),
        &DailyLogs::default(),
        &profile(),
        &gaining,
        &store,
        &tunables,
    )
    .unwrap();
    assert!(day.targets.recommendation.contains("deficit"));
    assert!((day.nutrition.optimal.protein - 68.0 * 2.2).abs() < 1e-9);
}
