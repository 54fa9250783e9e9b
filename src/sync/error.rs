// ABOUTME: Error taxonomy for the synchronizer
// ABOUTME: Splits run-fatal failures from row-skippable resolution failures

use thiserror::Error;

/// Run-fatal failures. Any of these aborts the whole run with no partial
/// state change; the scheduler decides whether to retry on its next
/// invocation.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Source connectivity or query failure during detection.
    #[error("source unavailable: {0}")]
    SourceUnavailable(anyhow::Error),

    /// Warehouse connectivity or query failure during detection or load.
    #[error("warehouse unavailable: {0}")]
    WarehouseUnavailable(anyhow::Error),

    /// Unexpected failure mid-batch; the transaction was rolled back and
    /// the watermark left untouched.
    #[error("batch transaction aborted: {0}")]
    TransactionAbort(anyhow::Error),
}

/// A single row that cannot be mapped onto the dimension tables.
///
/// Recovered locally: the row is set aside and reported in the summary,
/// the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {row_id} cannot be resolved: {reason}")]
pub struct ResolutionError {
    pub row_id: i64,
    pub reason: String,
}

impl ResolutionError {
    pub fn new(row_id: i64, reason: impl Into<String>) -> Self {
        Self {
            row_id,
            reason: reason.into(),
        }
    }
}
