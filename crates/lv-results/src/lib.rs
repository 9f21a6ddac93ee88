//! lv-results: saved calculation records and their document store.

pub mod store;
pub mod types;

pub use store::{JsonRecordStore, RecordStore, UpsertOutcome};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record {record_id} holds an invalid series: {source}")]
    InvalidSeries {
        record_id: String,
        source: lv_core::SeriesError,
    },
}
