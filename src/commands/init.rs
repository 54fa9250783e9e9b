// ABOUTME: Init command - prepares the warehouse star schema
// ABOUTME: Creates fact/dimension tables and seeds the fixed dimensions

use anyhow::{Context, Result};

use crate::{postgres, schema, utils};

pub async fn init(warehouse: &str, start_year: i32, end_year: i32) -> Result<()> {
    tracing::info!(
        "Initializing warehouse at {}",
        utils::sanitize_url(warehouse)
    );

    let client = postgres::connect_with_retry(warehouse)
        .await
        .context("Failed to connect to warehouse")?;

    schema::create_warehouse_tables(&client).await?;
    schema::seed_dimensions(&client, start_year, end_year).await?;

    let (dates, categories, countries) = schema::dimension_counts(&client).await?;

    println!("Warehouse initialized");
    println!("  dimdate:     {} rows", dates);
    println!("  dimcategory: {} rows", categories);
    println!("  dimcountry:  {} rows", countries);

    Ok(())
}
