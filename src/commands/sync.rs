// ABOUTME: Sync command - runs synchronization cycles
// ABOUTME: Single cycle by default; --interval loops until Ctrl+C

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::interval;

use crate::models::RunSummary;
use crate::sync::{ModuloResolver, Orchestrator, SalesChangeDetector, WarehouseLoader};
use crate::utils;

pub async fn sync(source: &str, warehouse: &str, interval_secs: Option<u64>) -> Result<()> {
    tracing::info!("Source: {}", utils::sanitize_url(source));
    tracing::info!("Warehouse: {}", utils::sanitize_url(warehouse));

    let orchestrator = Orchestrator::new(
        SalesChangeDetector::new(source, warehouse),
        ModuloResolver::default(),
        WarehouseLoader::new(warehouse),
    );

    match interval_secs {
        None => {
            let summary = orchestrator
                .run()
                .await
                .context("Synchronization run failed")?;
            print_summary(&summary);
            Ok(())
        }
        Some(secs) => {
            tracing::info!("Running continuously every {}s, Ctrl+C to stop", secs);
            let mut ticker = interval(Duration::from_secs(secs));
            let mut cycles = 0u64;

            loop {
                tokio::select! {
                    biased;

                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Shutdown signal received, stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        cycles += 1;
                        tracing::info!("Starting sync cycle {}", cycles);
                        match orchestrator.run().await {
                            Ok(summary) => print_summary(&summary),
                            Err(e) => {
                                // A failed cycle leaves the warehouse
                                // untouched; the next tick is the retry.
                                tracing::error!("Sync cycle {} failed: {}", cycles, e);
                            }
                        }
                    }
                }
            }
            Ok(())
        }
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("========================================");
    println!("Sync cycle complete");
    println!("========================================");
    println!("  Attempted:       {}", summary.attempted);
    println!("  Inserted:        {}", summary.inserted);
    println!("  Skipped:         {}", summary.skipped);
    println!("  Already present: {}", summary.already_present);
    println!(
        "  Watermark:       {} -> {}",
        summary.watermark_before, summary.watermark_after
    );
}
