//! Dataset quality reporting.
//!
//! The backend enforces nothing client-side, so this module counts what a
//! careful reader would want to know before trusting the derived numbers:
//! undecodable rows, unparseable text numerics, orphan events, duplicate
//! case ids, completions dated before their start. It reports, it never
//! rejects rows.

use std::collections::HashSet;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::model::Dataset;

/// Per-table fetch accounting, carried alongside the decoded rows.
#[derive(Debug, Clone, Serialize)]
pub struct TableStats {
    pub table: String,
    pub rows: u64,
    pub bad_rows: u64,
    pub raw_bytes: u64,
    pub fingerprint: String,
    pub fetch_failed: bool,
}

impl TableStats {
    pub fn failed(table: &str) -> Self {
        Self {
            table: table.to_string(),
            rows: 0,
            bad_rows: 0,
            raw_bytes: 0,
            fingerprint: String::new(),
            fetch_failed: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DataQualityReport {
    pub tables: Vec<TableStats>,
    pub orphan_events: u64,
    pub duplicate_case_ids: u64,
    pub unparsable_probabilities: u64,
    pub unscored_events: u64,
    pub inverted_durations: u64,
    pub warnings: Vec<String>,
}

pub fn fingerprint_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

pub fn assess(dataset: &Dataset, tables: &[TableStats]) -> DataQualityReport {
    let mut warnings = Vec::new();

    let case_ids: HashSet<i64> = dataset.cases.iter().map(|c| c.case_id).collect();
    let duplicate_case_ids = dataset.cases.len() as u64 - case_ids.len() as u64;
    if duplicate_case_ids > 0 {
        warnings.push(format!("duplicate_case_ids: {}", duplicate_case_ids));
    }

    let orphan_events = dataset
        .events
        .iter()
        .filter(|e| match e.case_id {
            Some(id) => !case_ids.contains(&id),
            None => true,
        })
        .count() as u64;
    if orphan_events > 0 {
        warnings.push(format!("orphan_events: {}", orphan_events));
    }

    let unparsable_probabilities = dataset
        .occupations
        .iter()
        .filter(|o| o.automation_probability.is_some() && o.risk_pct().is_none())
        .count() as u64;
    if unparsable_probabilities > 0 {
        warnings.push(format!(
            "unparsable_probabilities: {}",
            unparsable_probabilities
        ));
    }

    let unscored_events = dataset
        .events
        .iter()
        .filter(|e| e.score.is_some() && e.score_value().is_none())
        .count() as u64;

    let inverted_durations = dataset
        .cases
        .iter()
        .filter(|c| matches!(c.duration_days(), Some(d) if d < 0))
        .count() as u64;
    if inverted_durations > 0 {
        warnings.push(format!("completion_before_start: {}", inverted_durations));
    }

    for t in tables {
        if t.fetch_failed {
            warnings.push(format!("fetch_failed: {}", t.table));
        } else if t.bad_rows > 0 {
            warnings.push(format!("undecodable_rows: {} in {}", t.bad_rows, t.table));
        }
    }

    DataQualityReport {
        tables: tables.to_vec(),
        orphan_events,
        duplicate_case_ids,
        unparsable_probabilities,
        unscored_events,
        inverted_durations,
        warnings,
    }
}
