// ABOUTME: Warehouse star schema management
// ABOUTME: Creates fact/dimension tables and seeds the fixed dimensions

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use tokio_postgres::Client;

pub const CATEGORIES: [&str; 5] = ["Electronics", "Clothing", "Books", "Home & Garden", "Sports"];

pub const COUNTRIES: [&str; 10] = [
    "United States",
    "Canada",
    "United Kingdom",
    "Germany",
    "France",
    "Japan",
    "Australia",
    "Brazil",
    "India",
    "China",
];

const WAREHOUSE_DDL: &str = "
CREATE TABLE IF NOT EXISTS dimdate (
    dateid INTEGER PRIMARY KEY,
    date DATE NOT NULL,
    year INTEGER NOT NULL,
    quarter INTEGER NOT NULL,
    quartername VARCHAR(2) NOT NULL,
    month INTEGER NOT NULL,
    monthname VARCHAR(10) NOT NULL,
    day INTEGER NOT NULL,
    weekday INTEGER NOT NULL,
    weekdayname VARCHAR(10) NOT NULL
);

CREATE TABLE IF NOT EXISTS dimcategory (
    categoryid INTEGER PRIMARY KEY,
    category VARCHAR(50) NOT NULL
);

CREATE TABLE IF NOT EXISTS dimcountry (
    countryid INTEGER PRIMARY KEY,
    country VARCHAR(50) NOT NULL
);

CREATE TABLE IF NOT EXISTS factsales (
    rowid BIGINT PRIMARY KEY,
    product_id BIGINT NOT NULL,
    customer_id BIGINT NOT NULL,
    quantity BIGINT NOT NULL,
    price DECIMAL(10,2) NOT NULL,
    timestamp TIMESTAMP NOT NULL,
    date_key INTEGER NOT NULL REFERENCES dimdate(dateid),
    category_key INTEGER NOT NULL REFERENCES dimcategory(categoryid),
    country_key INTEGER NOT NULL REFERENCES dimcountry(countryid)
);
";

/// Create the warehouse tables if they don't exist.
pub async fn create_warehouse_tables(client: &Client) -> Result<()> {
    client
        .batch_execute(WAREHOUSE_DDL)
        .await
        .context("Failed to create warehouse tables")?;
    tracing::info!("Warehouse tables are in place");
    Ok(())
}

/// Seed the fixed dimension tables. Idempotent: existing rows are left
/// alone, so re-running `init` is safe.
///
/// `dimdate` gets one row per calendar day from Jan 1 of `start_year`
/// through Dec 31 of `end_year`; facts outside that range are rejected by
/// the date_key foreign key at load time.
pub async fn seed_dimensions(client: &Client, start_year: i32, end_year: i32) -> Result<()> {
    anyhow::ensure!(
        start_year <= end_year,
        "start_year {} is after end_year {}",
        start_year,
        end_year
    );

    for (idx, category) in CATEGORIES.iter().enumerate() {
        client
            .execute(
                "INSERT INTO dimcategory (categoryid, category) VALUES ($1, $2) \
                 ON CONFLICT (categoryid) DO NOTHING",
                &[&((idx as i32) + 1), category],
            )
            .await
            .context("Failed to seed dimcategory")?;
    }

    for (idx, country) in COUNTRIES.iter().enumerate() {
        client
            .execute(
                "INSERT INTO dimcountry (countryid, country) VALUES ($1, $2) \
                 ON CONFLICT (countryid) DO NOTHING",
                &[&((idx as i32) + 1), country],
            )
            .await
            .context("Failed to seed dimcountry")?;
    }

    let start = NaiveDate::from_ymd_opt(start_year, 1, 1).context("Invalid start year")?;
    let end = NaiveDate::from_ymd_opt(end_year, 12, 31).context("Invalid end year")?;

    let mut seeded = 0u64;
    let mut batch = String::new();
    let mut batch_rows = 0usize;
    let mut date = start;

    while date <= end {
        if batch_rows == 0 {
            batch.push_str(
                "INSERT INTO dimdate \
                 (dateid, date, year, quarter, quartername, month, monthname, day, weekday, weekdayname) VALUES ",
            );
        } else {
            batch.push_str(", ");
        }
        batch.push_str(&date_row_values(date));
        batch_rows += 1;

        // Statement text stays bounded; all values come from our own date
        // math, never from external input.
        if batch_rows == 1000 {
            batch.push_str(" ON CONFLICT (dateid) DO NOTHING");
            client
                .batch_execute(&batch)
                .await
                .context("Failed to seed dimdate")?;
            seeded += batch_rows as u64;
            batch.clear();
            batch_rows = 0;
        }

        date += Duration::days(1);
    }

    if batch_rows > 0 {
        batch.push_str(" ON CONFLICT (dateid) DO NOTHING");
        client
            .batch_execute(&batch)
            .await
            .context("Failed to seed dimdate")?;
        seeded += batch_rows as u64;
    }

    tracing::info!(
        "Seeded dimensions: {} categories, {} countries, {} dates ({}-{})",
        CATEGORIES.len(),
        COUNTRIES.len(),
        seeded,
        start_year,
        end_year
    );
    Ok(())
}

/// Row counts for the three dimension tables (date, category, country).
pub async fn dimension_counts(client: &Client) -> Result<(i64, i64, i64)> {
    let dates: i64 = client
        .query_one("SELECT COUNT(*) FROM dimdate", &[])
        .await
        .context("Failed to count dimdate")?
        .get(0);
    let categories: i64 = client
        .query_one("SELECT COUNT(*) FROM dimcategory", &[])
        .await
        .context("Failed to count dimcategory")?
        .get(0);
    let countries: i64 = client
        .query_one("SELECT COUNT(*) FROM dimcountry", &[])
        .await
        .context("Failed to count dimcountry")?
        .get(0);
    Ok((dates, categories, countries))
}

fn date_row_values(date: NaiveDate) -> String {
    let dateid = date.year() * 10_000 + (date.month() as i32) * 100 + date.day() as i32;
    let quarter = (date.month0() / 3) + 1;
    format!(
        "({}, '{}', {}, {}, 'Q{}', {}, '{}', {}, {}, '{}')",
        dateid,
        date.format("%Y-%m-%d"),
        date.year(),
        quarter,
        quarter,
        date.month(),
        date.format("%B"),
        date.day(),
        date.weekday().number_from_monday(),
        date.format("%A"),
    )
}
