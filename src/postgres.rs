// ABOUTME: Warehouse (PostgreSQL) connection helpers
// ABOUTME: Scoped connections with TLS support, acquired per logical operation

use anyhow::{Context, Result};
use std::time::Duration;
use tokio_postgres::Client;

/// Connect to the warehouse and spawn the connection driver task.
///
/// Callers hold the returned client only for the duration of one logical
/// operation and drop it on return; nothing here is pooled or shared
/// across runs.
pub async fn connect(url: &str) -> Result<Client> {
    let tls = native_tls::TlsConnector::builder()
        .build()
        .context("Failed to build TLS connector")?;
    let tls = postgres_native_tls::MakeTlsConnector::new(tls);

    let (client, connection) = tokio_postgres::connect(url, tls)
        .await
        .with_context(|| format!("Failed to connect to {}", crate::utils::sanitize_url(url)))?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::debug!("warehouse connection closed: {}", e);
        }
    });

    Ok(client)
}

/// Connect with a short retry loop for transient startup failures
/// (e.g. a warehouse endpoint waking from idle).
pub async fn connect_with_retry(url: &str) -> Result<Client> {
    let max_attempts = 3;
    let mut delay = Duration::from_secs(1);

    for attempt in 1..=max_attempts {
        match connect(url).await {
            Ok(client) => return Ok(client),
            Err(e) if attempt < max_attempts => {
                tracing::warn!(
                    "Warehouse connection attempt {}/{} failed: {}. Retrying in {:?}",
                    attempt,
                    max_attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(e) => return Err(e),
        }
    }
    unreachable!("retry loop always returns")
}
