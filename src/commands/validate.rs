// ABOUTME: Validate command - checks both databases are ready for synchronization
// ABOUTME: Connectivity, warehouse table presence, and dimension seeding

use anyhow::{bail, Context, Result};

use crate::source::SalesSource;
use crate::{postgres, schema, utils};

const WAREHOUSE_TABLES: [&str; 4] = ["dimdate", "dimcategory", "dimcountry", "factsales"];

pub async fn validate(source: &str, warehouse: &str) -> Result<()> {
    let mut ready = true;

    println!(
        "Validating source {} ...",
        utils::sanitize_url(source)
    );
    match SalesSource::new(source).ping().await {
        Ok(()) => println!("  ✓ source reachable, sales_data queryable"),
        Err(e) => {
            println!("  ✗ source check failed: {}", e);
            ready = false;
        }
    }

    println!(
        "Validating warehouse {} ...",
        utils::sanitize_url(warehouse)
    );
    let client = postgres::connect(warehouse)
        .await
        .context("Failed to connect to warehouse")?;
    println!("  ✓ warehouse reachable");

    for table in WAREHOUSE_TABLES {
        let exists: bool = client
            .query_one(
                "SELECT EXISTS (SELECT FROM information_schema.tables \
                 WHERE table_schema = 'public' AND table_name = $1)",
                &[&table],
            )
            .await
            .with_context(|| format!("Failed to check table {}", table))?
            .get(0);

        if exists {
            println!("  ✓ table {} exists", table);
        } else {
            println!("  ✗ table {} missing (run `warehouse-sync init`)", table);
            ready = false;
        }
    }

    if ready {
        let (dates, categories, countries) = schema::dimension_counts(&client).await?;
        if dates == 0 || categories == 0 || countries == 0 {
            println!(
                "  ✗ dimensions not seeded (dates={}, categories={}, countries={})",
                dates, categories, countries
            );
            ready = false;
        } else {
            println!(
                "  ✓ dimensions seeded (dates={}, categories={}, countries={})",
                dates, categories, countries
            );
        }
    }

    if !ready {
        bail!("Validation failed: databases are not ready for synchronization");
    }
    println!();
    println!("✓ Ready to synchronize");
    Ok(())
}
