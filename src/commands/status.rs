// ABOUTME: Status command - reports warehouse contents and sync lag
// ABOUTME: Watermark, per-table counts, sales totals, and source lag when available

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::source::SalesSource;
use crate::{postgres, schema};

pub async fn status(source: Option<&str>, warehouse: &str) -> Result<()> {
    let client = postgres::connect(warehouse)
        .await
        .context("Failed to connect to warehouse")?;

    let watermark: i64 = client
        .query_one("SELECT COALESCE(MAX(rowid), 0) FROM factsales", &[])
        .await
        .context("Failed to read watermark")?
        .get(0);

    let fact_count: i64 = client
        .query_one("SELECT COUNT(*) FROM factsales", &[])
        .await
        .context("Failed to count factsales")?
        .get(0);

    let (dates, categories, countries) = schema::dimension_counts(&client).await?;

    let summary = client
        .query_one(
            "SELECT SUM(quantity)::numeric, SUM(price * quantity)::numeric, MAX(timestamp) \
             FROM factsales",
            &[],
        )
        .await
        .context("Failed to summarize factsales")?;
    let total_quantity: Option<Decimal> = summary.get(0);
    let total_revenue: Option<Decimal> = summary.get(1);
    let latest_sale: Option<NaiveDateTime> = summary.get(2);

    println!("Warehouse status");
    println!("  factsales:   {} rows (watermark {})", fact_count, watermark);
    println!("  dimdate:     {} rows", dates);
    println!("  dimcategory: {} rows", categories);
    println!("  dimcountry:  {} rows", countries);
    println!(
        "  total quantity: {}",
        total_quantity.unwrap_or_default()
    );
    println!(
        "  total revenue:  {}",
        total_revenue.unwrap_or_default()
    );
    match latest_sale {
        Some(ts) => println!("  latest sale:    {}", ts),
        None => println!("  latest sale:    (none)"),
    }

    if let Some(source_url) = source {
        let source_max = SalesSource::new(source_url)
            .max_row_id()
            .await
            .context("Failed to read source max rowid")?;
        println!();
        println!("Source status");
        println!("  max rowid: {}", source_max);
        println!("  lag:       {} rows", (source_max - watermark).max(0));
    }

    Ok(())
}
