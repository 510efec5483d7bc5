//! Archive persistence backends.
//!
//! The store only needs a synchronous load/save of the whole dated map.
//! The archive is bounded (a month of snapshots), so backends write the full
//! map on every save.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use vt_common::{DailySnapshot, Error, Result};

/// Dated snapshot map as persisted by a backend.
pub type Archive = BTreeMap<NaiveDate, DailySnapshot>;

/// Synchronous key-value persistence for the snapshot archive.
pub trait ArchiveBackend {
    /// Load the full archive. A backend with nothing saved yet returns an
    /// empty map.
    fn load(&self) -> Result<Archive>;

    /// Replace the persisted archive with `archive`.
    fn save(&mut self, archive: &Archive) -> Result<()>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// Volatile backend, mainly for tests and one-shot computations.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    data: Archive,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing archive.
    pub fn with_archive(data: Archive) -> Self {
        Self { data }
    }
}

impl ArchiveBackend for MemoryBackend {
    fn load(&self) -> Result<Archive> {
        Ok(self.data.clone())
    }

    fn save(&mut self, archive: &Archive) -> Result<()> {
        self.data = archive.clone();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// JSON file backend: one object keyed by ISO date.
///
/// Writes go to a sibling temp file first and are then renamed over the
/// archive, so a crash mid-write leaves the previous archive intact.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "archive.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ArchiveBackend for JsonFileBackend {
    fn load(&self) -> Result<Archive> {
        if !self.path.exists() {
            return Ok(Archive::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Archive::new());
        }
        let archive: Archive = serde_json::from_str(&content).map_err(|e| {
            Error::Storage(format!("{} is not a valid archive: {}", self.path.display(), e))
        })?;
        Ok(archive)
    }

    fn save(&mut self, archive: &Archive) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.temp_path();
        {
            let mut file = fs::File::create(&tmp)?;
            serde_json::to_writer_pretty(&mut file, archive)?;
            file.write_all(b"\n")?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use vt_common::Metric;

    fn snapshot(day: u32, sleep: f64) -> DailySnapshot {
        let date = NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
        let at = Utc.with_ymd_and_hms(2026, 3, day, 21, 0, 0).unwrap();
        DailySnapshot::new(date, at).with(Metric::Sleep, sleep).unwrap()
    }

    #[test]
    fn memory_backend_round_trip() {
        let mut backend = MemoryBackend::new();
        assert!(backend.load().unwrap().is_empty());

        let mut archive = Archive::new();
        let snap = snapshot(2, 80.0);
        archive.insert(snap.date, snap);
        backend.save(&archive).unwrap();
        assert_eq!(backend.load().unwrap(), archive);
    }

    #[test]
    fn file_backend_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("nested/archive.json"));
        assert!(backend.load().unwrap().is_empty());
    }

    #[test]
    fn file_backend_round_trip_keys_by_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archive.json");
        let mut backend = JsonFileBackend::new(&path);

        let mut archive = Archive::new();
        for (day, value) in [(1, 60.0), (3, 72.0)] {
            let snap = snapshot(day, value);
            archive.insert(snap.date, snap);
        }
        backend.save(&archive).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["2026-03-03"]["sleep"], 72.0);
        assert!(!backend.temp_path().exists());

        assert_eq!(backend.load().unwrap(), archive);
    }

    #[test]
    fn file_backend_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archive.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        let err = JsonFileBackend::new(&path).load().unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }
}
