// ABOUTME: Core data model for the synchronizer
// ABOUTME: Source rows, dimension keys, fact records, and per-run reports

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A transactional sales row as produced by the operational source.
///
/// Immutable once created; the synchronizer never writes back to the
/// source. `row_id` is source-assigned and strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    pub row_id: i64,
    pub product_id: i64,
    pub customer_id: i64,
    pub quantity: i64,
    pub price: Decimal,
    pub occurred_at: NaiveDateTime,
}

/// Surrogate keys into the pre-seeded warehouse dimension tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionKeys {
    pub date_key: i32,
    pub category_key: i32,
    pub country_key: i32,
}

/// A warehouse fact row: a source record joined with its dimension keys.
///
/// Written exactly once per `row_id` (the fact table's primary key) and
/// never updated afterwards; the fact table is append-only.
#[derive(Debug, Clone, PartialEq)]
pub struct FactRecord {
    pub source: SourceRecord,
    pub keys: DimensionKeys,
}

/// Outcome of loading one batch into the warehouse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Rows newly inserted in this batch.
    pub inserted: u64,
    /// Rows whose `row_id` already existed in the fact table (benign
    /// collisions from a re-run; not an error).
    pub skipped_row_ids: Vec<i64>,
    /// Max row_id durably present after the batch, or the prior watermark
    /// if the batch was empty.
    pub new_watermark: i64,
}

/// A row set aside during resolution, reported in the run summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub row_id: i64,
    pub reason: String,
}

/// Summary emitted when a run reaches the Done state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    /// Source rows fetched beyond the watermark.
    pub attempted: u64,
    /// Rows newly committed to the fact table.
    pub inserted: u64,
    /// Rows excluded by the resolver (reported, never silently dropped).
    pub skipped: u64,
    /// Rows that were already present in the fact table.
    pub already_present: u64,
    pub watermark_before: i64,
    pub watermark_after: i64,
}

impl RunSummary {
    /// True when the run had nothing to do.
    pub fn is_noop(&self) -> bool {
        self.attempted == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_summary_noop() {
        let summary = RunSummary {
            watermark_before: 42,
            watermark_after: 42,
            ..Default::default()
        };
        assert!(summary.is_noop());
    }

    #[test]
    fn test_load_report_default_is_empty() {
        let report = LoadReport::default();
        assert_eq!(report.inserted, 0);
        assert!(report.skipped_row_ids.is_empty());
    }
}
