// ABOUTME: Fact loader - writes resolved fact records into the warehouse
// ABOUTME: One scoped transaction per batch; duplicate row_ids are benign no-ops

use async_trait::async_trait;

use super::error::SyncError;
use crate::models::{FactRecord, LoadReport};

// ON CONFLICT DO NOTHING makes a re-appearing row_id a per-row no-op, so
// re-runs after an orchestrator-level retry stay safe.
const FACT_INSERT_SQL: &str = "INSERT INTO factsales \
     (rowid, product_id, customer_id, quantity, price, timestamp, date_key, category_key, country_key) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
     ON CONFLICT (rowid) DO NOTHING";

/// Writes one batch of resolved records to the fact table.
///
/// Either every insert in the batch commits, or none do: any unexpected
/// failure rolls the whole batch back and leaves the watermark unchanged.
#[async_trait]
pub trait FactLoader {
    async fn load(
        &self,
        batch: &[FactRecord],
        prior_watermark: i64,
    ) -> Result<LoadReport, SyncError>;
}

/// Production loader against the PostgreSQL warehouse.
pub struct WarehouseLoader {
    warehouse_url: String,
}

impl WarehouseLoader {
    pub fn new(warehouse_url: impl Into<String>) -> Self {
        Self {
            warehouse_url: warehouse_url.into(),
        }
    }
}

#[async_trait]
impl FactLoader for WarehouseLoader {
    async fn load(
        &self,
        batch: &[FactRecord],
        prior_watermark: i64,
    ) -> Result<LoadReport, SyncError> {
        if batch.is_empty() {
            return Ok(LoadReport {
                inserted: 0,
                skipped_row_ids: Vec::new(),
                new_watermark: prior_watermark,
            });
        }

        let mut client = crate::postgres::connect(&self.warehouse_url)
            .await
            .map_err(SyncError::WarehouseUnavailable)?;

        // Dropping the transaction without commit rolls everything back,
        // so an early return on error leaves the warehouse untouched.
        let tx = client
            .transaction()
            .await
            .map_err(|e| SyncError::WarehouseUnavailable(e.into()))?;

        let mut inserted = 0u64;
        let mut skipped_row_ids = Vec::new();
        let mut max_row_id = prior_watermark;

        for record in batch {
            let src = &record.source;
            let keys = &record.keys;
            let affected = tx
                .execute(
                    FACT_INSERT_SQL,
                    &[
                        &src.row_id,
                        &src.product_id,
                        &src.customer_id,
                        &src.quantity,
                        &src.price,
                        &src.occurred_at,
                        &keys.date_key,
                        &keys.category_key,
                        &keys.country_key,
                    ],
                )
                .await
                .map_err(|e| SyncError::TransactionAbort(e.into()))?;

            if affected == 0 {
                // Primary-key collision: the row is already durably
                // present from an earlier run.
                skipped_row_ids.push(src.row_id);
            } else {
                inserted += 1;
            }
            max_row_id = max_row_id.max(src.row_id);
        }

        tx.commit()
            .await
            .map_err(|e| SyncError::TransactionAbort(e.into()))?;

        Ok(LoadReport {
            inserted,
            skipped_row_ids,
            new_watermark: max_row_id,
        })
    }
}
