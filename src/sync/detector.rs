// ABOUTME: Change detector - finds the warehouse watermark and the source rows beyond it
// ABOUTME: Connections are scoped to each call; retry policy belongs to the caller

use async_trait::async_trait;

use super::error::SyncError;
use crate::models::SourceRecord;
use crate::source::SalesSource;

/// Determines what is new since the last run.
///
/// `fetch_since` must return rows strictly greater than the watermark in
/// ascending row_id order so the loader can advance the watermark
/// monotonically. Neither operation retries internally.
#[async_trait]
pub trait ChangeDetector {
    /// Highest row_id already durably present in the fact table; 0 when
    /// the fact table is empty (the universal starting point).
    async fn current_watermark(&self) -> Result<i64, SyncError>;

    /// Source rows with `row_id > watermark`, ascending.
    async fn fetch_since(&self, watermark: i64) -> Result<Vec<SourceRecord>, SyncError>;
}

/// Production detector: watermark from the PostgreSQL fact table, new rows
/// from the MySQL `sales_data` table.
pub struct SalesChangeDetector {
    source: SalesSource,
    warehouse_url: String,
}

impl SalesChangeDetector {
    pub fn new(source_url: impl Into<String>, warehouse_url: impl Into<String>) -> Self {
        Self {
            source: SalesSource::new(source_url),
            warehouse_url: warehouse_url.into(),
        }
    }
}

#[async_trait]
impl ChangeDetector for SalesChangeDetector {
    async fn current_watermark(&self) -> Result<i64, SyncError> {
        let client = crate::postgres::connect(&self.warehouse_url)
            .await
            .map_err(SyncError::WarehouseUnavailable)?;

        let row = client
            .query_one("SELECT COALESCE(MAX(rowid), 0) FROM factsales", &[])
            .await
            .map_err(|e| SyncError::WarehouseUnavailable(e.into()))?;

        Ok(row.get(0))
    }

    async fn fetch_since(&self, watermark: i64) -> Result<Vec<SourceRecord>, SyncError> {
        self.source
            .fetch_since(watermark)
            .await
            .map_err(SyncError::SourceUnavailable)
    }
}
