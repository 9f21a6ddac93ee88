//! History menu entries, recomputed from the store on demand.

use std::cmp::Reverse;

use chrono::{DateTime, FixedOffset};
use lv_results::{RecordId, RecordStore};

use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: RecordId,
    pub label: String,
    pub timestamp: String,
}

/// Saved records, most recent first.
pub fn history(store: &dyn RecordStore) -> AppResult<Vec<HistoryEntry>> {
    let mut records = store.list_all()?;
    records.sort_by_cached_key(|r| Reverse(sort_key(&r.timestamp)));

    Ok(records
        .into_iter()
        .map(|r| HistoryEntry {
            label: format!("α={}, β={} — {}", r.alpha, r.beta, r.timestamp),
            id: r.id,
            timestamp: r.timestamp,
        })
        .collect())
}

/// Parsed instants order across UTC offsets; unparsable timestamps sort
/// after every parsed one, by their text.
fn sort_key(timestamp: &str) -> (Option<DateTime<FixedOffset>>, String) {
    (
        DateTime::parse_from_rfc3339(timestamp).ok(),
        timestamp.to_string(),
    )
}
