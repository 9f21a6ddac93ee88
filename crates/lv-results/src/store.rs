//! Record storage API.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::CalculationRecord;
use crate::{ResultsError, ResultsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Flat collection of records keyed by id.
///
/// No concurrent-writer guarantees: callers serialize their own access.
pub trait RecordStore {
    fn upsert(&self, record: CalculationRecord) -> ResultsResult<UpsertOutcome>;
    fn get(&self, id: &str) -> ResultsResult<Option<CalculationRecord>>;
    fn list_all(&self) -> ResultsResult<Vec<CalculationRecord>>;
    fn clear_all(&self) -> ResultsResult<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    records: Vec<CalculationRecord>,
}

/// All records in one JSON document, rewritten whole on every mutation.
#[derive(Debug, Clone)]
pub struct JsonRecordStore {
    path: PathBuf,
}

impl JsonRecordStore {
    pub fn new(path: PathBuf) -> ResultsResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| ResultsError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> ResultsResult<StoreDocument> {
        if !self.path.exists() {
            return Ok(StoreDocument::default());
        }
        let content = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        if content.trim().is_empty() {
            return Ok(StoreDocument::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, document: &StoreDocument) -> ResultsResult<()> {
        let json = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, json).map_err(|source| self.io_error(source))?;
        debug!(path = %self.path.display(), records = document.records.len(), "record store written");
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> ResultsError {
        ResultsError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl RecordStore for JsonRecordStore {
    fn upsert(&self, record: CalculationRecord) -> ResultsResult<UpsertOutcome> {
        let mut document = self.load()?;
        let outcome = match document.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => {
                *existing = record;
                UpsertOutcome::Updated
            }
            None => {
                document.records.push(record);
                UpsertOutcome::Inserted
            }
        };
        self.write(&document)?;
        Ok(outcome)
    }

    fn get(&self, id: &str) -> ResultsResult<Option<CalculationRecord>> {
        Ok(self.load()?.records.into_iter().find(|r| r.id == id))
    }

    fn list_all(&self) -> ResultsResult<Vec<CalculationRecord>> {
        Ok(self.load()?.records)
    }

    fn clear_all(&self) -> ResultsResult<()> {
        self.write(&StoreDocument::default())
    }
}
