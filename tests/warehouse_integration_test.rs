// ABOUTME: Integration tests for schema management, fact loading, and full sync cycles
// ABOUTME: Env-gated; point TEST_WAREHOUSE_URL / TEST_SOURCE_URL at dedicated scratch databases

use std::env;

use chrono::NaiveDateTime;
use mysql_async::prelude::*;
use rust_decimal::Decimal;

use warehouse_sync::models::{FactRecord, SourceRecord};
use warehouse_sync::schema;
use warehouse_sync::sync::{
    DimensionResolver, FactLoader, ModuloResolver, Orchestrator, SalesChangeDetector, SyncError,
    WarehouseLoader,
};

/// Warehouse URL from the environment; tests mutate factsales, so this
/// must be a dedicated scratch database.
fn warehouse_url() -> Option<String> {
    env::var("TEST_WAREHOUSE_URL").ok()
}

fn source_url() -> Option<String> {
    env::var("TEST_SOURCE_URL").ok()
}

fn record(row_id: i64, product_id: i64, customer_id: i64) -> SourceRecord {
    SourceRecord {
        row_id,
        product_id,
        customer_id,
        quantity: 3,
        price: Decimal::new(4999, 2),
        occurred_at: NaiveDateTime::parse_from_str("2024-02-10 14:30:00", "%Y-%m-%d %H:%M:%S")
            .unwrap(),
    }
}

fn resolve(records: &[SourceRecord]) -> Vec<FactRecord> {
    let resolver = ModuloResolver::default();
    records
        .iter()
        .map(|source| FactRecord {
            source: source.clone(),
            keys: resolver.resolve(source).unwrap(),
        })
        .collect()
}

async fn prepare_warehouse(url: &str) -> tokio_postgres::Client {
    let client = warehouse_sync::postgres::connect(url)
        .await
        .expect("Failed to connect to warehouse");
    schema::create_warehouse_tables(&client)
        .await
        .expect("Failed to create tables");
    schema::seed_dimensions(&client, 2024, 2024)
        .await
        .expect("Failed to seed dimensions");
    client
        .batch_execute("TRUNCATE factsales")
        .await
        .expect("Failed to truncate factsales");
    client
}

#[tokio::test]
#[ignore]
async fn test_init_creates_schema_and_seeds_dimensions() {
    let url = warehouse_url().expect("TEST_WAREHOUSE_URL must be set");
    let client = prepare_warehouse(&url).await;

    let (dates, categories, countries) = schema::dimension_counts(&client)
        .await
        .expect("Failed to count dimensions");

    assert_eq!(categories, schema::CATEGORIES.len() as i64);
    assert_eq!(countries, schema::COUNTRIES.len() as i64);
    assert_eq!(dates, 366, "2024 is a leap year");

    // Seeding again must be a no-op.
    schema::seed_dimensions(&client, 2024, 2024)
        .await
        .expect("Re-seeding failed");
    let (dates_again, _, _) = schema::dimension_counts(&client).await.unwrap();
    assert_eq!(dates_again, dates);

    println!("✓ Warehouse schema created and seeded");
}

#[tokio::test]
#[ignore]
async fn test_loader_commits_batch_and_tolerates_duplicates() {
    let url = warehouse_url().expect("TEST_WAREHOUSE_URL must be set");
    let client = prepare_warehouse(&url).await;

    let batch = resolve(&[record(1, 4, 2), record(2, 9, 5), record(3, 11, 8)]);
    let loader = WarehouseLoader::new(&url);

    let report = loader.load(&batch, 0).await.expect("Load failed");
    assert_eq!(report.inserted, 3);
    assert!(report.skipped_row_ids.is_empty());
    assert_eq!(report.new_watermark, 3);

    // Re-running the same batch is a per-row no-op, not a failure.
    let report = loader.load(&batch, 0).await.expect("Re-load failed");
    assert_eq!(report.inserted, 0);
    assert_eq!(report.skipped_row_ids, vec![1, 2, 3]);
    assert_eq!(report.new_watermark, 3);

    let count: i64 = client
        .query_one("SELECT COUNT(*) FROM factsales", &[])
        .await
        .unwrap()
        .get(0);
    assert_eq!(count, 3);

    println!("✓ Loader committed batch once and ignored duplicates");
}

#[tokio::test]
#[ignore]
async fn test_loader_rolls_back_whole_batch_on_failure() {
    let url = warehouse_url().expect("TEST_WAREHOUSE_URL must be set");
    let client = prepare_warehouse(&url).await;

    let mut batch = resolve(&[record(10, 1, 1), record(11, 2, 2), record(12, 3, 3)]);
    // Middle row points at a date the dimension was never seeded for, so
    // its foreign key violates mid-batch.
    batch[1].keys.date_key = 19990101;

    let loader = WarehouseLoader::new(&url);
    let err = loader.load(&batch, 0).await.unwrap_err();
    assert!(matches!(err, SyncError::TransactionAbort(_)));

    let count: i64 = client
        .query_one("SELECT COUNT(*) FROM factsales", &[])
        .await
        .unwrap()
        .get(0);
    assert_eq!(count, 0, "rolled-back batch must leave no rows behind");

    println!("✓ Loader rolled back the entire batch");
}

#[tokio::test]
#[ignore]
async fn test_full_sync_cycle_end_to_end() {
    let wh_url = warehouse_url().expect("TEST_WAREHOUSE_URL must be set");
    let src_url = source_url().expect("TEST_SOURCE_URL must be set");

    let client = prepare_warehouse(&wh_url).await;

    // Seed the source table.
    let opts = mysql_async::Opts::from_url(&src_url).expect("Invalid TEST_SOURCE_URL");
    let pool = mysql_async::Pool::new(opts);
    let mut conn = pool.get_conn().await.expect("Failed to connect to source");
    conn.query_drop("DROP TABLE IF EXISTS sales_data")
        .await
        .unwrap();
    conn.query_drop(
        "CREATE TABLE sales_data ( \
             rowid BIGINT PRIMARY KEY, \
             product_id BIGINT NOT NULL, \
             customer_id BIGINT NOT NULL, \
             quantity BIGINT NOT NULL, \
             price DECIMAL(10,2) NOT NULL, \
             `timestamp` DATETIME NOT NULL)",
    )
    .await
    .unwrap();
    conn.query_drop(
        "INSERT INTO sales_data VALUES \
             (1, 4, 2, 1, 19.99, '2024-02-10 14:30:00'), \
             (2, 9, 5, 2, 5.50, '2024-02-11 09:00:00'), \
             (3, 11, 8, 1, 120.00, '2024-02-12 18:45:00')",
    )
    .await
    .unwrap();
    drop(conn);
    pool.disconnect().await.unwrap();

    let orchestrator = Orchestrator::new(
        SalesChangeDetector::new(&src_url, &wh_url),
        ModuloResolver::default(),
        WarehouseLoader::new(&wh_url),
    );

    let summary = orchestrator.run().await.expect("First run failed");
    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.inserted, 3);
    assert_eq!(summary.watermark_before, 0);
    assert_eq!(summary.watermark_after, 3);

    // Second run with no new source rows is a no-op.
    let summary = orchestrator.run().await.expect("Second run failed");
    assert_eq!(summary.attempted, 0);
    assert_eq!(summary.inserted, 0);
    assert_eq!(summary.watermark_after, 3);

    let count: i64 = client
        .query_one("SELECT COUNT(*) FROM factsales", &[])
        .await
        .unwrap()
        .get(0);
    assert_eq!(count, 3);

    println!(
        "✓ Full cycle synchronized {} rows and was idempotent on re-run",
        count
    );
}
