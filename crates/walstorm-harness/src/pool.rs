// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Barrier-released worker pool.
//!
//! Spawns one task per worker. Every task waits at a counting barrier until
//! all of them have arrived, then they all call the batch writer at once so
//! the store's write lock sees maximum contention. The pool then drains with
//! a deadline: workers still running when it passes are detached, not
//! cancelled, and reported as [`WorkerOutcome::Incomplete`].

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Barrier;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use walstorm_config::{PoolConfig, StoreConfig};
use walstorm_core::{WorkerId, WorkerOutcome, WorkerTask, WriteCause, WriteError};
use walstorm_storage::run_batch;

/// A fixed-size set of concurrent batch writers sharing one store.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    store: StoreConfig,
    workers: u32,
    iterations: u32,
    timeout: Duration,
}

impl WorkerPool {
    pub fn new(store: StoreConfig, pool: &PoolConfig) -> Self {
        Self {
            store,
            workers: pool.workers,
            iterations: pool.iterations,
            timeout: pool.timeout(),
        }
    }

    /// Override the drain deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run every worker and collect their outcomes, sorted by worker id.
    pub async fn run(&self) -> Vec<WorkerOutcome> {
        self.run_with(|_| {}).await
    }

    /// Like [`run`](Self::run), calling `on_outcome` as each worker reaches a
    /// terminal state (completion order, then abandoned workers by id).
    pub async fn run_with<F>(&self, mut on_outcome: F) -> Vec<WorkerOutcome>
    where
        F: FnMut(&WorkerOutcome),
    {
        let barrier = Arc::new(Barrier::new(self.workers as usize));
        let mut set = JoinSet::new();

        for n in 0..self.workers {
            let task = WorkerTask::new(WorkerId(n), self.iterations);
            let barrier = Arc::clone(&barrier);
            let store = self.store.clone();
            set.spawn(async move {
                barrier.wait().await;
                debug!(worker = %task.worker_id, "worker released");
                (task.worker_id, run_batch(&store, task).await)
            });
        }
        info!(
            workers = self.workers,
            iterations = self.iterations,
            timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            "worker pool started"
        );

        let mut pending: BTreeSet<WorkerId> = (0..self.workers).map(WorkerId).collect();
        let mut outcomes = Vec::with_capacity(self.workers as usize);
        let deadline = drain_deadline(self.timeout);
        let mut timed_out = false;

        loop {
            match tokio::time::timeout_at(deadline, set.join_next()).await {
                Ok(Some(Ok((worker_id, result)))) => {
                    pending.remove(&worker_id);
                    let outcome = match result {
                        Ok(batch) => WorkerOutcome::Completed(batch),
                        Err(err) => {
                            warn!(worker = %worker_id, error = %err.cause, "worker failed");
                            WorkerOutcome::Failed(err)
                        }
                    };
                    on_outcome(&outcome);
                    outcomes.push(outcome);
                }
                Ok(Some(Err(join_err))) => {
                    error!(error = %join_err, "worker task died");
                }
                Ok(None) => break,
                Err(_) => {
                    timed_out = true;
                    warn!(
                        remaining = pending.len(),
                        "pool deadline passed, abandoning running workers"
                    );
                    set.detach_all();
                    break;
                }
            }
        }

        for worker_id in pending {
            let outcome = if timed_out {
                WorkerOutcome::Incomplete { worker_id }
            } else {
                WorkerOutcome::Failed(WriteError::new(
                    worker_id,
                    WriteCause::Aborted("task ended without reporting a result".to_string()),
                ))
            };
            on_outcome(&outcome);
            outcomes.push(outcome);
        }

        outcomes.sort_by_key(WorkerOutcome::worker_id);
        info!(
            completed = outcomes.iter().filter(|o| o.is_completed()).count(),
            total = outcomes.len(),
            "worker pool drained"
        );
        outcomes
    }
}

/// Deadline for the drain loop. Timeouts too large for the clock are clamped
/// to thirty years, which never fires in practice.
fn drain_deadline(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout)
        .unwrap_or_else(|| now + Duration::from_secs(86_400 * 365 * 30))
}
