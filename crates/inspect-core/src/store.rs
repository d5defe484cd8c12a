//! Snapshot persistence

use crate::error::CoreError;
use crate::snapshot::SnapshotRecord;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Write-once, read-many storage for snapshot records.
pub trait SnapshotStore {
    /// Persist `record` under its timestamp, returning where it went.
    fn save(&self, record: &SnapshotRecord) -> Result<PathBuf, CoreError>;

    /// Read every stored record. Fails on the first malformed record.
    fn load_all(&self) -> Result<Vec<SnapshotRecord>, CoreError>;

    /// Where records end up, for operator messages.
    fn location(&self) -> &Path;
}

/// One pretty-printed `<timestamp>.json` file per record in a flat directory.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn record_path(&self, timestamp: &str) -> PathBuf {
        self.dir.join(format!("{}.json", timestamp))
    }

    /// Record files in sorted order. A missing directory holds no records.
    pub fn record_paths(&self) -> Result<Vec<PathBuf>, CoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(self.dir.as_path()).to_path_buf();
                CoreError::io("list", path, e.into())
            })?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path.to_path_buf());
            }
        }
        Ok(paths)
    }

    fn load(path: &Path) -> Result<SnapshotRecord, CoreError> {
        let contents = fs::read_to_string(path).map_err(|e| CoreError::io("read", path, e))?;
        let record: SnapshotRecord = serde_json::from_str(&contents)
            .map_err(|e| CoreError::malformed(path.display().to_string(), e.to_string()))?;
        record.validate().map_err(|e| match e {
            CoreError::MalformedRecord { reason, .. } => {
                CoreError::malformed(path.display().to_string(), reason)
            }
            other => other,
        })?;
        Ok(record)
    }
}

impl SnapshotStore for JsonDirStore {
    fn save(&self, record: &SnapshotRecord) -> Result<PathBuf, CoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| CoreError::io("create", &self.dir, e))?;

        let path = self.record_path(record.timestamp());
        if path.exists() {
            log::warn!("Snapshot {} already exists and will be overwritten", path.display());
        }

        // Four-space indent to match the log files operators already have.
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        serde::Serialize::serialize(record, &mut serializer).map_err(|e| CoreError::Encode {
            timestamp: record.timestamp().to_string(),
            source: e,
        })?;

        fs::write(&path, buffer).map_err(|e| CoreError::io("write", &path, e))?;
        log::info!("Saved snapshot {}", path.display());
        Ok(path)
    }

    fn load_all(&self) -> Result<Vec<SnapshotRecord>, CoreError> {
        let records = self
            .record_paths()?
            .iter()
            .map(|path| Self::load(path))
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("Loaded {} snapshot records from {}", records.len(), self.dir.display());
        Ok(records)
    }

    fn location(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expectation::ExpectationModel;
    use crate::snapshot::reconcile_at;
    use std::collections::BTreeMap;

    fn record(timestamp: &str) -> SnapshotRecord {
        let totals = BTreeMap::from([("fuse".to_string(), 1)]);
        let model = ExpectationModel::from_counts([("fuse", 1)], &totals).unwrap();
        reconcile_at(["fuse"], &model, timestamp)
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path().join("snaps"));

        let path = store.save(&record("20250102_000000")).unwrap();
        store.save(&record("20250101_000000")).unwrap();
        assert_eq!(path, dir.path().join("snaps/20250102_000000.json"));

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\n    \"timestamp\": \"20250102_000000\""));

        let loaded = store.load_all().unwrap();
        let stamps: Vec<_> = loaded.iter().map(|r| r.timestamp()).collect();
        assert_eq!(stamps, vec!["20250101_000000", "20250102_000000"]);
        assert_eq!(loaded[1], record("20250102_000000"));
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path().join("nothing"));
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_ignores_non_json_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        store.save(&record("20250101_000000")).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a record").unwrap();
        fs::create_dir(dir.path().join("nested.json")).unwrap();

        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_rejects_batch_on_malformed_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        store.save(&record("20250101_000000")).unwrap();
        fs::write(
            dir.path().join("20250101_000001.json"),
            r#"{"timestamp": "x", "expected": {"fuse": 1}, "expected_not_ok": {"fuse": 0},
                "ok_detected": {"fuse": 1}, "not_ok_detected": {}}"#,
        )
        .unwrap();

        let err = store.load_all().unwrap_err();
        match err {
            CoreError::MalformedRecord { source_name, reason } => {
                assert!(source_name.ends_with("20250101_000001.json"));
                assert!(reason.contains("not_ok_detected"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
