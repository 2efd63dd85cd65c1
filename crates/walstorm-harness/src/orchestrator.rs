// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Run orchestration: schema, worker pool, then aggregation.
//!
//! Per-worker failures are collected into the [`RunReport`] and never stop the
//! aggregation step. Schema and aggregation failures are returned as errors.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::info;
use walstorm_config::{WalstormConfig, validate_config};
use walstorm_core::{AggregateRow, WalstormError, WorkerId, WorkerOutcome, WriteError};
use walstorm_storage::{StoreHandle, ensure_schema, summarize};

use crate::pool::WorkerPool;

/// Everything a run produced.
#[derive(Debug)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// One outcome per worker, ascending by worker id.
    pub outcomes: Vec<WorkerOutcome>,
    /// Per-worker summary read back after the pool drained.
    pub summary: Vec<AggregateRow>,
}

impl RunReport {
    /// Rows confirmed by committed batches.
    pub fn total_affected(&self) -> u64 {
        self.outcomes.iter().map(WorkerOutcome::affected).sum()
    }

    /// Rows the aggregation found, across all groups.
    pub fn total_recorded(&self) -> u64 {
        self.summary.iter().map(|row| row.count).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &WriteError> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            WorkerOutcome::Failed(err) => Some(err),
            _ => None,
        })
    }

    pub fn incomplete(&self) -> Vec<WorkerId> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                WorkerOutcome::Incomplete { worker_id } => Some(*worker_id),
                _ => None,
            })
            .collect()
    }

    /// True when every worker committed its batch.
    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(WorkerOutcome::is_completed)
    }
}

/// Sequences one harness run against a configured store.
pub struct Orchestrator {
    config: WalstormConfig,
    pool_timeout: Option<Duration>,
}

impl Orchestrator {
    pub fn new(config: WalstormConfig) -> Self {
        Self {
            config,
            pool_timeout: None,
        }
    }

    /// Override the pool drain deadline from the configuration.
    pub fn with_pool_timeout(mut self, timeout: Duration) -> Self {
        self.pool_timeout = Some(timeout);
        self
    }

    pub fn config(&self) -> &WalstormConfig {
        &self.config
    }

    pub async fn run(&self) -> Result<RunReport, WalstormError> {
        self.run_with(|_| {}).await
    }

    /// Run the harness, calling `on_outcome` as each worker finishes.
    pub async fn run_with<F>(&self, on_outcome: F) -> Result<RunReport, WalstormError>
    where
        F: FnMut(&WorkerOutcome),
    {
        validate_config(&self.config).map_err(|errors| {
            WalstormError::Config(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })?;

        let started_at = Utc::now();
        let store = &self.config.store;

        let handle = StoreHandle::open(store).await?;
        ensure_schema(&handle).await?;
        handle.close().await?;

        let mut pool = WorkerPool::new(store.clone(), &self.config.pool);
        if let Some(timeout) = self.pool_timeout {
            pool = pool.with_timeout(timeout);
        }
        let outcomes = pool.run_with(on_outcome).await;

        let summary = summarize(store).await?;
        let finished_at = Utc::now();

        let report = RunReport {
            started_at,
            finished_at,
            outcomes,
            summary,
        };
        info!(
            location = %store.location,
            affected = report.total_affected(),
            recorded = report.total_recorded(),
            groups = report.summary.len(),
            elapsed_ms = (finished_at - started_at).num_milliseconds(),
            "run finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use walstorm_core::{BatchResult, WriteCause};

    use super::*;

    fn report(outcomes: Vec<WorkerOutcome>) -> RunReport {
        RunReport {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            outcomes,
            summary: Vec::new(),
        }
    }

    #[test]
    fn report_totals_and_failures() {
        let report = report(vec![
            WorkerOutcome::Completed(BatchResult {
                worker_id: WorkerId(0),
                attempted: 10,
                affected: 10,
            }),
            WorkerOutcome::Failed(WriteError::new(
                WorkerId(1),
                WriteCause::Aborted("boom".into()),
            )),
            WorkerOutcome::Incomplete {
                worker_id: WorkerId(2),
            },
        ]);

        assert_eq!(report.total_affected(), 10);
        assert_eq!(report.total_recorded(), 0);
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.incomplete(), vec![WorkerId(2)]);
        assert!(!report.is_clean());
    }

    #[tokio::test]
    async fn invalid_config_is_rejected_before_touching_the_store() {
        let mut config = WalstormConfig::default();
        config.pool.workers = 0;
        config.store.location = "/nonexistent/dir/never-created.db".to_string();

        let err = Orchestrator::new(config).run().await.expect_err("zero workers");
        assert!(matches!(err, WalstormError::Config(_)), "got {err}");
    }
}
