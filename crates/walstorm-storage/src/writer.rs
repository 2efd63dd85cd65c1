// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batch writer: one worker's inserts as a single transaction.
//!
//! A worker opens its own [`StoreHandle`], stages every row in memory, then
//! ships the whole batch to the connection thread in one call. There the batch
//! runs inside a `BEGIN IMMEDIATE` transaction against one cached prepared
//! insert. The write lock is taken at `BEGIN`, so a worker either waits in
//! SQLite's busy handler (up to the configured ceiling) or fails before any
//! row is written. There is no retry loop on top of the busy handler.
//!
//! Any failure drops the transaction uncommitted, which rolls it back: a
//! worker's rows are either all visible or none are.

use std::time::Duration;

use rusqlite::{ErrorCode, TransactionBehavior, params};
use thiserror::Error;
use tracing::{debug, info, warn};
use walstorm_config::StoreConfig;
use walstorm_core::{BatchResult, RECORD_TABLE, WorkerId, WorkerTask, WriteCause, WriteError};

use crate::database::StoreHandle;

/// Rows staged for one worker, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    worker_id: WorkerId,
    payloads: Vec<String>,
}

impl Batch {
    /// Stage every row of `task`.
    pub fn stage(task: &WorkerTask) -> Self {
        Self {
            worker_id: task.worker_id,
            payloads: task.payloads().collect(),
        }
    }

    pub fn worker_id(&self) -> WorkerId {
        self.worker_id
    }

    pub fn payloads(&self) -> &[String] {
        &self.payloads
    }

    /// Number of staged rows.
    pub fn attempted(&self) -> u32 {
        u32::try_from(self.payloads.len()).unwrap_or(u32::MAX)
    }
}

/// Failure raised on the connection thread.
#[derive(Debug, Error)]
enum BatchFailure {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("store confirmed {affected} of {attempted} rows")]
    Shortfall { attempted: u32, affected: u32 },
}

/// Run one worker's batch against the store described by `config`.
pub async fn run_batch(config: &StoreConfig, task: WorkerTask) -> Result<BatchResult, WriteError> {
    let worker_id = task.worker_id;
    let handle = StoreHandle::open(config)
        .await
        .map_err(|e| WriteError::new(worker_id, WriteCause::Connection(Box::new(e))))?;

    let batch = Batch::stage(&task);
    let attempted = batch.attempted();
    let ceiling = config.busy_timeout();
    debug!(worker = %worker_id, rows = attempted, "submitting batch");

    let affected = handle
        .connection()
        .call(move |conn| execute_staged(conn, &batch))
        .await
        .map_err(|e| {
            let err = WriteError::new(worker_id, classify(e, ceiling));
            warn!(worker = %worker_id, error = %err.cause, "batch rolled back");
            err
        })?;

    if let Err(e) = handle.close().await {
        // The batch is already committed; a close failure does not undo it.
        warn!(worker = %worker_id, error = %e, "store handle close failed after commit");
    }

    info!(worker = %worker_id, attempted, affected, "batch committed");
    Ok(BatchResult {
        worker_id,
        attempted,
        affected,
    })
}

fn insert_sql() -> String {
    format!("INSERT INTO {RECORD_TABLE} (worker_id, payload) VALUES (?1, ?2)")
}

/// Execute a staged batch in one immediate transaction.
///
/// Counts the rows the store confirms; anything short of the staged count
/// aborts the transaction.
fn execute_staged(conn: &mut rusqlite::Connection, batch: &Batch) -> Result<u32, BatchFailure> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let affected = {
        let mut stmt = tx.prepare_cached(&insert_sql())?;
        let mut affected = 0u32;
        for payload in batch.payloads() {
            if stmt.execute(params![batch.worker_id().0, payload])? > 0 {
                affected += 1;
            }
        }
        affected
    };

    let attempted = batch.attempted();
    if affected < attempted {
        return Err(BatchFailure::Shortfall {
            attempted,
            affected,
        });
    }

    tx.commit()?;
    Ok(affected)
}

fn classify(err: tokio_rusqlite::Error<BatchFailure>, ceiling: Duration) -> WriteCause {
    match err {
        tokio_rusqlite::Error::Error(BatchFailure::Shortfall {
            attempted,
            affected,
        }) => WriteCause::Shortfall {
            attempted,
            affected,
        },
        tokio_rusqlite::Error::Error(BatchFailure::Sqlite(e)) => classify_sqlite(e, ceiling),
        other => WriteCause::Store {
            source: Box::new(std::io::Error::other(other.to_string())),
        },
    }
}

/// Map a SQLite error to a write cause. Busy and locked results can only
/// surface once the busy handler has given up, so they mean the ceiling expired.
fn classify_sqlite(err: rusqlite::Error, ceiling: Duration) -> WriteCause {
    match err.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => {
            WriteCause::ContentionTimeout {
                ceiling,
                source: Box::new(err),
            }
        }
        Some(ErrorCode::ConstraintViolation) => WriteCause::Constraint {
            source: Box::new(err),
        },
        _ => WriteCause::Store {
            source: Box::new(err),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use walstorm_core::WorkerId;
    use walstorm_test_utils::{TestStore, WriteLockHolder, inject};

    use super::*;
    use crate::queries::records;
    use crate::schema::ensure_schema;

    async fn prepared_store(busy_timeout_ms: u64) -> TestStore {
        let store = TestStore::builder()
            .busy_timeout_ms(busy_timeout_ms)
            .build()
            .unwrap();
        let handle = StoreHandle::open(store.config()).await.unwrap();
        ensure_schema(&handle).await.unwrap();
        handle.close().await.unwrap();
        store
    }

    async fn rows_for(store: &TestStore, worker: u32) -> Vec<walstorm_core::Record> {
        let handle = StoreHandle::open(store.config()).await.unwrap();
        let rows = records::worker_records(&handle, WorkerId(worker)).await.unwrap();
        handle.close().await.unwrap();
        rows
    }

    #[test]
    fn stage_builds_padded_rows() {
        let batch = Batch::stage(&WorkerTask::new(WorkerId(4), 3));
        assert_eq!(batch.worker_id(), WorkerId(4));
        assert_eq!(batch.payloads(), ["00000", "00001", "00002"]);
        assert_eq!(batch.attempted(), 3);
    }

    #[tokio::test]
    async fn batch_commits_every_row() {
        let store = prepared_store(10_000).await;
        let result = run_batch(store.config(), WorkerTask::new(WorkerId(2), 25))
            .await
            .unwrap();
        assert_eq!(
            result,
            BatchResult {
                worker_id: WorkerId(2),
                attempted: 25,
                affected: 25,
            }
        );

        let rows = rows_for(&store, 2).await;
        assert_eq!(rows.len(), 25);
        let payloads: Vec<&str> = rows.iter().map(|r| r.payload.as_str()).collect();
        let expected: Vec<String> = (0..25).map(walstorm_core::payload_for).collect();
        assert_eq!(payloads, expected);
    }

    #[tokio::test]
    async fn empty_batch_commits_nothing() {
        let store = prepared_store(10_000).await;
        let result = run_batch(store.config(), WorkerTask::new(WorkerId(0), 0))
            .await
            .unwrap();
        assert_eq!(result.attempted, 0);
        assert_eq!(result.affected, 0);
        assert!(rows_for(&store, 0).await.is_empty());
    }

    #[tokio::test]
    async fn zero_ceiling_surfaces_contention_timeout() {
        let store = prepared_store(0).await;
        let holder = WriteLockHolder::acquire(store.path()).unwrap();

        let err = run_batch(store.config(), WorkerTask::new(WorkerId(1), 10))
            .await
            .expect_err("write lock is held elsewhere");
        assert_eq!(err.worker_id, WorkerId(1));
        assert!(err.is_contention_timeout(), "unexpected cause: {err}");

        holder.release().unwrap();
        assert!(rows_for(&store, 1).await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn busy_wait_absorbs_short_contention() {
        let store = prepared_store(10_000).await;
        let holder = WriteLockHolder::acquire(store.path()).unwrap();

        let config = store.config().clone();
        let writer =
            tokio::spawn(async move { run_batch(&config, WorkerTask::new(WorkerId(3), 50)).await });

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!writer.is_finished(), "writer should be waiting for the lock");
        holder.release().unwrap();

        let result = writer.await.unwrap().unwrap();
        assert_eq!(result.affected, 50);
        assert_eq!(rows_for(&store, 3).await.len(), 50);
    }

    #[tokio::test]
    async fn mid_batch_failure_rolls_back_whole_batch() {
        let store = prepared_store(10_000).await;
        inject::abort_row(store.path(), WorkerId(5), "00007").unwrap();

        let err = run_batch(store.config(), WorkerTask::new(WorkerId(5), 20))
            .await
            .expect_err("row 7 aborts");
        assert_eq!(err.worker_id, WorkerId(5));
        assert!(matches!(err.cause, WriteCause::Constraint { .. }), "got {err}");
        assert!(rows_for(&store, 5).await.is_empty(), "no partial rows may remain");
    }

    #[tokio::test]
    async fn unconfirmed_row_is_a_shortfall_and_rolls_back() {
        let store = prepared_store(10_000).await;
        inject::ignore_row(store.path(), WorkerId(6), "00003").unwrap();

        let err = run_batch(store.config(), WorkerTask::new(WorkerId(6), 10))
            .await
            .expect_err("one row is ignored");
        assert!(
            matches!(
                err.cause,
                WriteCause::Shortfall {
                    attempted: 10,
                    affected: 9
                }
            ),
            "got {err}"
        );
        assert!(rows_for(&store, 6).await.is_empty());
    }

    #[tokio::test]
    async fn missing_relation_is_a_store_failure() {
        let store = TestStore::new().unwrap();
        let err = run_batch(store.config(), WorkerTask::new(WorkerId(0), 1))
            .await
            .expect_err("relation was never created");
        assert!(matches!(err.cause, WriteCause::Store { .. }), "got {err}");
    }
}
