//! JSON file backend for `RateStore`.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::ProbeError;
use crate::state::{Loaded, RateRecord, RateStore};

/// Stores the record as JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct FileRateStore {
    path: PathBuf,
}

impl FileRateStore {
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
            .unwrap_or_default();
        name.push(format!(".{}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }

    fn write_temp(&self, tmp: &Path, record: &RateRecord) -> std::io::Result<()> {
        let file = File::create(tmp)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, record)?;
        writer.flush()?;
        writer.get_ref().sync_all()
    }
}

impl RateStore for FileRateStore {
    fn load(&self) -> Loaded {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Loaded::Missing,
            Err(e) => return Loaded::Corrupt(e.to_string()),
        };
        match serde_json::from_reader(BufReader::new(file)) {
            Ok(record) => Loaded::Found(record),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Rate record unreadable");
                Loaded::Corrupt(e.to_string())
            }
        }
    }

    fn store(&self, record: &RateRecord) -> Result<(), ProbeError> {
        let tmp = self.temp_path();
        let result = self
            .write_temp(&tmp, record)
            .and_then(|()| fs::rename(&tmp, &self.path));

        result.map_err(|e| {
            let _ = fs::remove_file(&tmp);
            ProbeError::StateUnavailable(format!(
                "Unable to write {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %self.path.display(), ?record, "Rate record stored");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRateStore::new(dir.path().join("last_run"));
        assert_eq!(store.load(), Loaded::Missing);
    }

    #[test]
    fn store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRateStore::new(dir.path().join("last_run"));
        let record = RateRecord { timestamp: 1_700_000_000, counter: 42 };

        store.store(&record).unwrap();
        assert_eq!(store.load(), Loaded::Found(record));

        // Only the record itself remains; the temp file was renamed away.
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn store_replaces_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRateStore::new(dir.path().join("last_run"));
        store.store(&RateRecord { timestamp: 1, counter: 1 }).unwrap();
        store.store(&RateRecord { timestamp: 2, counter: 9 }).unwrap();
        assert_eq!(
            store.load(),
            Loaded::Found(RateRecord { timestamp: 2, counter: 9 })
        );
    }

    #[test]
    fn garbage_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last_run");
        fs::write(&path, "[1700000000, ").unwrap();
        assert!(matches!(FileRateStore::new(path).load(), Loaded::Corrupt(_)));
    }

    #[test]
    fn unwritable_directory_is_state_unavailable() {
        let store = FileRateStore::new("/nonexistent-dir/last_run");
        assert!(matches!(
            store.store(&RateRecord { timestamp: 1, counter: 1 }),
            Err(ProbeError::StateUnavailable(_))
        ));
    }
}
