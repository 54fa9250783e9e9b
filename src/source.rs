// ABOUTME: Operational source (MySQL) access
// ABOUTME: Fetches sales rows beyond a watermark, connection scoped per call

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use mysql_async::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::SourceRecord;

// DECIMAL and DATETIME are selected as text and parsed here, so the wire
// types stay independent of driver-side conversion features.
const FETCH_SINCE_SQL: &str = "SELECT rowid, product_id, customer_id, quantity, \
     CAST(price AS CHAR), DATE_FORMAT(`timestamp`, '%Y-%m-%d %H:%i:%s') \
     FROM sales_data WHERE rowid > ? ORDER BY rowid";

/// Read-only access to the `sales_data` table on the operational store.
///
/// Each call opens its own connection and releases it before returning;
/// nothing is held across calls.
pub struct SalesSource {
    url: String,
}

impl SalesSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Fetch all rows with `rowid > watermark`, ascending.
    pub async fn fetch_since(&self, watermark: i64) -> Result<Vec<SourceRecord>> {
        let pool = self.pool()?;
        let mut conn = pool
            .get_conn()
            .await
            .context("Failed to connect to source database")?;

        let raw: Vec<(i64, i64, i64, i64, String, String)> = conn
            .exec(FETCH_SINCE_SQL, (watermark,))
            .await
            .context("Failed to query sales_data for new rows")?;

        drop(conn);
        pool.disconnect()
            .await
            .context("Failed to release source connection")?;

        raw.into_iter().map(parse_record).collect()
    }

    /// Highest row_id present on the source, 0 for an empty table.
    ///
    /// Used for lag reporting only; the sync path never needs it.
    pub async fn max_row_id(&self) -> Result<i64> {
        let pool = self.pool()?;
        let mut conn = pool
            .get_conn()
            .await
            .context("Failed to connect to source database")?;

        let max: Option<i64> = conn
            .query_first("SELECT COALESCE(MAX(rowid), 0) FROM sales_data")
            .await
            .context("Failed to query max rowid from sales_data")?;

        drop(conn);
        pool.disconnect()
            .await
            .context("Failed to release source connection")?;

        Ok(max.unwrap_or(0))
    }

    /// Verify connectivity and that `sales_data` is queryable.
    pub async fn ping(&self) -> Result<()> {
        let pool = self.pool()?;
        let mut conn = pool
            .get_conn()
            .await
            .context("Failed to connect to source database")?;

        conn.query_drop("SELECT 1 FROM sales_data LIMIT 1")
            .await
            .context("Source table sales_data is not queryable")?;

        drop(conn);
        pool.disconnect()
            .await
            .context("Failed to release source connection")?;
        Ok(())
    }

    fn pool(&self) -> Result<mysql_async::Pool> {
        let opts = mysql_async::Opts::from_url(&self.url)
            .with_context(|| format!("Invalid source URL {}", crate::utils::sanitize_url(&self.url)))?;
        Ok(mysql_async::Pool::new(opts))
    }
}

fn parse_record(row: (i64, i64, i64, i64, String, String)) -> Result<SourceRecord> {
    let (row_id, product_id, customer_id, quantity, price, occurred_at) = row;

    let price = Decimal::from_str(&price)
        .with_context(|| format!("row {}: unparseable price {:?}", row_id, price))?;
    let occurred_at = NaiveDateTime::parse_from_str(&occurred_at, "%Y-%m-%d %H:%M:%S")
        .with_context(|| format!("row {}: unparseable timestamp {:?}", row_id, occurred_at))?;

    Ok(SourceRecord {
        row_id,
        product_id,
        customer_id,
        quantity,
        price,
        occurred_at,
    })
}
