// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-worker summary of the record relation.
//!
//! One fixed grouping query, run through a read-intent handle. Usable after a
//! pool drains or standalone against a store left by an earlier run.

use tracing::debug;
use walstorm_config::StoreConfig;
use walstorm_core::{AggregateRow, RECORD_TABLE, WalstormError, WorkerId};

use crate::database::StoreHandle;
use crate::queries::parse_recorded_at;

/// Open a read-intent handle on `config` and summarize the store.
///
/// Every failure, including a store that cannot be opened, is reported as
/// [`WalstormError::Aggregation`].
pub async fn summarize(config: &StoreConfig) -> Result<Vec<AggregateRow>, WalstormError> {
    let handle = StoreHandle::open_for_read(config)
        .await
        .map_err(aggregation_err)?;
    let rows = summarize_with(&handle).await?;
    handle.close().await.map_err(aggregation_err)?;
    Ok(rows)
}

fn aggregation_err(e: WalstormError) -> WalstormError {
    WalstormError::Aggregation {
        source: Box::new(e),
    }
}

/// Count rows and find the latest `recorded_at` per worker, ascending by worker.
pub async fn summarize_with(handle: &StoreHandle) -> Result<Vec<AggregateRow>, WalstormError> {
    let sql = format!(
        "SELECT worker_id, COUNT(*) AS cnt, MAX(recorded_at) AS latest
         FROM {RECORD_TABLE}
         GROUP BY worker_id
         ORDER BY worker_id"
    );
    let raw: Vec<(u32, i64, String)> = handle
        .connection()
        .call(move |conn| -> Result<Vec<(u32, i64, String)>, rusqlite::Error> {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;
            let result = rows.collect::<Result<Vec<_>, _>>()?;
            Ok(result)
        })
        .await
        .map_err(|e| WalstormError::Aggregation {
            source: Box::new(e),
        })?;

    let rows = raw
        .into_iter()
        .map(|(worker, count, latest)| {
            Ok(AggregateRow {
                worker_id: WorkerId(worker),
                count: u64::try_from(count).unwrap_or_default(),
                latest_recorded_at: parse_recorded_at(&latest).map_err(|e| {
                    WalstormError::Aggregation {
                        source: Box::new(e),
                    }
                })?,
            })
        })
        .collect::<Result<Vec<_>, WalstormError>>()?;

    debug!(location = %handle.location(), groups = rows.len(), "store summarized");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use walstorm_core::WorkerTask;
    use walstorm_test_utils::TestStore;

    use super::*;
    use crate::schema::ensure_schema;
    use crate::writer::run_batch;

    async fn prepared_store() -> TestStore {
        let store = TestStore::new().unwrap();
        let handle = StoreHandle::open(store.config()).await.unwrap();
        ensure_schema(&handle).await.unwrap();
        handle.close().await.unwrap();
        store
    }

    #[tokio::test]
    async fn empty_store_has_no_groups() {
        let store = prepared_store().await;
        assert!(summarize(store.config()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn groups_are_counted_and_ordered() {
        let store = prepared_store().await;
        let before = chrono::Utc::now() - chrono::Duration::milliseconds(1);
        for (worker, rows) in [(2u32, 3u32), (0, 5), (1, 1)] {
            run_batch(store.config(), WorkerTask::new(WorkerId(worker), rows))
                .await
                .unwrap();
        }
        let after = chrono::Utc::now();

        let summary = summarize(store.config()).await.unwrap();
        let counts: Vec<(WorkerId, u64)> = summary.iter().map(|r| (r.worker_id, r.count)).collect();
        assert_eq!(
            counts,
            vec![(WorkerId(0), 5), (WorkerId(1), 1), (WorkerId(2), 3)]
        );
        for row in &summary {
            assert!(row.latest_recorded_at >= before && row.latest_recorded_at <= after);
        }
    }

    #[tokio::test]
    async fn missing_relation_is_an_aggregation_error() {
        let store = TestStore::new().unwrap();
        StoreHandle::open(store.config())
            .await
            .unwrap()
            .close()
            .await
            .unwrap();

        let err = summarize(store.config()).await.expect_err("no relation");
        assert!(matches!(err, WalstormError::Aggregation { .. }), "got {err}");
    }

    #[tokio::test]
    async fn missing_store_file_is_an_aggregation_error() {
        let store = TestStore::new().unwrap();

        let err = summarize(store.config()).await.expect_err("no store file");
        assert!(matches!(err, WalstormError::Aggregation { .. }), "got {err}");
        assert!(!store.path().exists(), "read intent must not create the store");
    }

    #[tokio::test]
    async fn legacy_timestamps_are_readable() {
        let store = prepared_store().await;
        let handle = StoreHandle::open(store.config()).await.unwrap();
        handle
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO testtbl (worker_id, payload, recorded_at)
                     VALUES (4, '00000', '2018-06-01 12:34:56')",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        let summary = summarize_with(&handle).await.unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].worker_id, WorkerId(4));
        assert_eq!(summary[0].latest_recorded_at.to_rfc3339(), "2018-06-01T12:34:56+00:00");
        handle.close().await.unwrap();
    }
}
