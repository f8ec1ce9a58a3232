//! Baseline persistence: save and restore fitted parameters between runs.
//!
//! The core never persists anything on its own; these adapters are for
//! callers that want to fit once and score in a later process.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::info;

use crate::error::{ScoringError, ScoringResult};

use super::types::{BaselineParameters, BaselineRecord};

/// Storage for a single baseline record.
pub trait BaselineStore {
    /// Replace the stored record.
    fn save(&self, record: &BaselineRecord) -> ScoringResult<()>;

    /// Load the stored record, or `None` if nothing has been saved yet.
    fn load(&self) -> ScoringResult<Option<BaselineRecord>>;

    /// Save fitted parameters as a fresh record.
    fn save_parameters(&self, params: &BaselineParameters) -> ScoringResult<BaselineRecord> {
        let record = params.to_record();
        self.save(&record)?;
        Ok(record)
    }

    /// Load and validate parameters.
    fn load_parameters(&self) -> ScoringResult<Option<BaselineParameters>> {
        self.load()?.map(|r| r.to_parameters()).transpose()
    }
}

/// JSON-file baseline store.
///
/// Writes go to `<path>.tmp` first and are renamed over the target, so an
/// interrupted write never leaves a truncated record behind.
pub struct JsonFileBaseline {
    path: PathBuf,
}

impl JsonFileBaseline {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BaselineStore for JsonFileBaseline {
    fn save(&self, record: &BaselineRecord) -> ScoringResult<()> {
        let json = serde_json::to_string_pretty(record)?;

        let tmp_path = self.path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;

        info!(
            path = %self.path.display(),
            mu = record.mu,
            sigma = record.sigma,
            "baseline record saved"
        );
        Ok(())
    }

    fn load(&self) -> ScoringResult<Option<BaselineRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let record: BaselineRecord = serde_json::from_str(&contents)?;
        Ok(Some(record))
    }
}

/// In-memory baseline store (for testing).
#[derive(Default)]
pub struct InMemoryBaseline {
    record: Mutex<Option<BaselineRecord>>,
}

impl InMemoryBaseline {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BaselineStore for InMemoryBaseline {
    fn save(&self, record: &BaselineRecord) -> ScoringResult<()> {
        let mut slot = self.record.lock().map_err(|_| ScoringError::LockError)?;
        *slot = Some(record.clone());
        Ok(())
    }

    fn load(&self) -> ScoringResult<Option<BaselineRecord>> {
        let slot = self.record.lock().map_err(|_| ScoringError::LockError)?;
        Ok(slot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::fit;

    #[test]
    fn json_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileBaseline::new(dir.path().join("baseline.json"));

        let params = fit(&[0.2, 0.5, 1.1, 0.9, 0.4]).unwrap();
        store.save_parameters(&params).unwrap();

        let loaded = store.load_parameters().unwrap().unwrap();
        assert_eq!(loaded, params);
        assert!(!dir.path().join("baseline.tmp").exists());
    }

    #[test]
    fn json_load_nonexistent_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileBaseline::new(dir.path().join("missing.json"));
        assert!(store.load().unwrap().is_none());
        assert!(store.load_parameters().unwrap().is_none());
    }

    #[test]
    fn json_load_corrupt_file_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("baseline.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileBaseline::new(&path);
        assert!(matches!(store.load(), Err(ScoringError::Persistence(_))));
    }

    #[test]
    fn json_save_overwrites_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileBaseline::new(dir.path().join("baseline.json"));

        store
            .save_parameters(&BaselineParameters::new(0.0, 1.0).unwrap())
            .unwrap();
        store
            .save_parameters(&BaselineParameters::new(2.0, 0.5).unwrap())
            .unwrap();

        let loaded = store.load_parameters().unwrap().unwrap();
        assert!((loaded.mu() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn mismatched_epsilon_is_rejected_on_load() {
        let store = InMemoryBaseline::new();
        let mut record = BaselineParameters::new(0.0, 1.0).unwrap().to_record();
        record.epsilon = 1e-3;
        store.save(&record).unwrap();

        assert!(matches!(
            store.load_parameters(),
            Err(ScoringError::EpsilonMismatch { .. })
        ));
    }

    #[test]
    fn in_memory_store() {
        let store = InMemoryBaseline::new();
        assert!(store.load().unwrap().is_none());

        let record = store
            .save_parameters(&BaselineParameters::new(-0.3, 0.8).unwrap())
            .unwrap();
        assert_eq!(store.load().unwrap(), Some(record));
    }

    #[test]
    fn store_trait_object() {
        let store: Box<dyn BaselineStore> = Box::new(InMemoryBaseline::new());
        store
            .save_parameters(&BaselineParameters::new(0.0, 1.0).unwrap())
            .unwrap();
        assert!(store.load_parameters().unwrap().is_some());
    }
}
