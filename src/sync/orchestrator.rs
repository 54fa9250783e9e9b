// ABOUTME: Synchronization orchestrator - sequences detect, resolve, load
// ABOUTME: Owns the run state machine and emits the final summary

use std::fmt;

use super::detector::ChangeDetector;
use super::error::SyncError;
use super::loader::FactLoader;
use super::resolver::DimensionResolver;
use crate::models::{FactRecord, RunSummary, SkippedRow};

/// States of one synchronizer run.
///
/// `Idle -> Detecting -> Resolving -> Loading -> Done`, with `Failed` as
/// the terminal state for any run-fatal error in Detecting or Loading.
/// Resolving degrades per row and never fails the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Detecting,
    Resolving,
    Loading,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "IDLE",
            RunState::Detecting => "DETECTING",
            RunState::Resolving => "RESOLVING",
            RunState::Loading => "LOADING",
            RunState::Done => "DONE",
            RunState::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Sequences detector -> resolver -> loader for a single run.
///
/// Performs no retry or backoff of its own; the caller (a scheduler slot,
/// or the interval loop in the CLI) decides whether a failed run is tried
/// again. Concurrent runs against the same warehouse are not coordinated
/// here and must be serialized externally.
pub struct Orchestrator<D, R, L> {
    detector: D,
    resolver: R,
    loader: L,
}

impl<D, R, L> Orchestrator<D, R, L>
where
    D: ChangeDetector + Sync,
    R: DimensionResolver + Sync,
    L: FactLoader + Sync,
{
    pub fn new(detector: D, resolver: R, loader: L) -> Self {
        Self {
            detector,
            resolver,
            loader,
        }
    }

    /// Run one synchronization cycle to completion.
    ///
    /// On success the warehouse watermark has advanced by exactly the
    /// count of genuinely new, resolvable rows; on error the warehouse is
    /// exactly as it was before the run started.
    pub async fn run(&self) -> Result<RunSummary, SyncError> {
        match self.run_inner().await {
            Ok(summary) => Ok(summary),
            Err(e) => {
                transition(RunState::Failed);
                tracing::error!("run failed: {}", e);
                Err(e)
            }
        }
    }

    async fn run_inner(&self) -> Result<RunSummary, SyncError> {
        transition(RunState::Detecting);
        let watermark = self.detector.current_watermark().await?;
        let rows = self.detector.fetch_since(watermark).await?;
        tracing::info!(
            watermark,
            new_rows = rows.len(),
            "detection complete"
        );

        if rows.is_empty() {
            transition(RunState::Done);
            let summary = RunSummary {
                watermark_before: watermark,
                watermark_after: watermark,
                ..Default::default()
            };
            log_summary(&summary);
            return Ok(summary);
        }

        transition(RunState::Resolving);
        let attempted = rows.len() as u64;
        let mut resolved: Vec<FactRecord> = Vec::with_capacity(rows.len());
        let mut skip_list: Vec<SkippedRow> = Vec::new();

        for source in rows {
            match self.resolver.resolve(&source) {
                Ok(keys) => resolved.push(FactRecord { source, keys }),
                Err(e) => {
                    tracing::warn!(row_id = e.row_id, "skipping row: {}", e.reason);
                    skip_list.push(SkippedRow {
                        row_id: e.row_id,
                        reason: e.reason,
                    });
                }
            }
        }
        tracing::info!(
            resolved = resolved.len(),
            skipped = skip_list.len(),
            "resolution complete"
        );

        transition(RunState::Loading);
        let report = self.loader.load(&resolved, watermark).await?;
        tracing::info!(
            inserted = report.inserted,
            already_present = report.skipped_row_ids.len(),
            new_watermark = report.new_watermark,
            "load complete"
        );

        transition(RunState::Done);
        let summary = RunSummary {
            attempted,
            inserted: report.inserted,
            skipped: skip_list.len() as u64,
            already_present: report.skipped_row_ids.len() as u64,
            watermark_before: watermark,
            watermark_after: report.new_watermark,
        };
        log_summary(&summary);
        Ok(summary)
    }
}

fn transition(to: RunState) {
    tracing::info!(state = %to, "state transition");
}

fn log_summary(summary: &RunSummary) {
    tracing::info!(
        attempted = summary.attempted,
        inserted = summary.inserted,
        skipped = summary.skipped,
        already_present = summary.already_present,
        watermark_before = summary.watermark_before,
        watermark_after = summary.watermark_after,
        "run summary"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_state_display() {
        assert_eq!(RunState::Idle.to_string(), "IDLE");
        assert_eq!(RunState::Detecting.to_string(), "DETECTING");
        assert_eq!(RunState::Done.to_string(), "DONE");
        assert_eq!(RunState::Failed.to_string(), "FAILED");
    }
}
