//! Saving, loading and clearing calculation records.

use chrono::{Local, SecondsFormat};
use lv_results::{CalculationRecord, RecordId, RecordStore, UpsertOutcome};
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::pipeline::CompletedCalc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistOutcome {
    pub id: RecordId,
    pub outcome: UpsertOutcome,
}

impl PersistOutcome {
    pub fn message(&self) -> &'static str {
        match self.outcome {
            UpsertOutcome::Inserted => "Calculation saved",
            UpsertOutcome::Updated => "Calculation updated",
        }
    }
}

/// Store `completed` under `existing_id`, or under a fresh id when absent.
pub fn persist(
    store: &dyn RecordStore,
    completed: Option<&CompletedCalc>,
    existing_id: Option<&str>,
) -> AppResult<PersistOutcome> {
    let completed = completed.ok_or_else(|| {
        AppError::Persistence("nothing to save, run a calculation first".to_string())
    })?;

    let id = existing_id
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let timestamp = Local::now().to_rfc3339_opts(SecondsFormat::Micros, false);
    let record = CalculationRecord::new(id.clone(), timestamp, &completed.params, &completed.series);

    let outcome = store.upsert(record)?;
    info!(record_id = %id, ?outcome, "calculation persisted");
    Ok(PersistOutcome { id, outcome })
}

/// Fetch a record and rebuild its calculation.
pub fn load_record(store: &dyn RecordStore, id: &str) -> AppResult<(RecordId, CompletedCalc)> {
    let record = store
        .get(id)?
        .ok_or_else(|| AppError::Persistence(format!("record not found: {}", id)))?;
    let series = record.series()?;
    Ok((
        record.id.clone(),
        CompletedCalc {
            params: record.params(),
            series,
        },
    ))
}

pub fn clear_history(store: &dyn RecordStore) -> AppResult<()> {
    store.clear_all()?;
    info!("calculation history cleared");
    Ok(())
}
