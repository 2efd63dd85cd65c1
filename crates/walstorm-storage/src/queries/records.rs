// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record read-back for verifying what the workers committed.

use rusqlite::params;
use walstorm_core::{RECORD_TABLE, Record, WalstormError, WorkerId};

use crate::database::{StoreHandle, map_tr_err};
use crate::queries::parse_recorded_at;

/// All rows written by `worker_id`, in rowid order.
pub async fn worker_records(
    handle: &StoreHandle,
    worker_id: WorkerId,
) -> Result<Vec<Record>, WalstormError> {
    let sql = format!(
        "SELECT id, worker_id, payload, recorded_at FROM {RECORD_TABLE}
         WHERE worker_id = ?1 ORDER BY id ASC"
    );
    let raw: Vec<(i64, u32, String, String)> = handle
        .connection()
        .call(move |conn| -> Result<Vec<(i64, u32, String, String)>, rusqlite::Error> {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![worker_id.0], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?;
            let result = rows.collect::<Result<Vec<_>, _>>()?;
            Ok(result)
        })
        .await
        .map_err(map_tr_err)?;

    raw.into_iter()
        .map(|(id, worker, payload, recorded_at)| {
            Ok(Record {
                id,
                worker_id: WorkerId(worker),
                payload,
                recorded_at: parse_recorded_at(&recorded_at).map_err(|e| {
                    WalstormError::Storage {
                        source: Box::new(e),
                    }
                })?,
            })
        })
        .collect()
}

/// Total number of rows in the relation.
pub async fn count(handle: &StoreHandle) -> Result<u64, WalstormError> {
    let sql = format!("SELECT COUNT(*) FROM {RECORD_TABLE}");
    let count: i64 = handle
        .connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.query_row(&sql, [], |row| row.get(0))
        })
        .await
        .map_err(map_tr_err)?;
    Ok(u64::try_from(count).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use walstorm_core::WorkerTask;
    use walstorm_test_utils::TestStore;

    use super::*;
    use crate::schema::ensure_schema;
    use crate::writer::run_batch;

    #[tokio::test]
    async fn records_are_scoped_to_worker_and_ordered() {
        let store = TestStore::new().unwrap();
        let handle = StoreHandle::open(store.config()).await.unwrap();
        ensure_schema(&handle).await.unwrap();

        run_batch(store.config(), WorkerTask::new(WorkerId(0), 4)).await.unwrap();
        run_batch(store.config(), WorkerTask::new(WorkerId(1), 6)).await.unwrap();

        let zero = worker_records(&handle, WorkerId(0)).await.unwrap();
        let one = worker_records(&handle, WorkerId(1)).await.unwrap();
        assert_eq!(zero.len(), 4);
        assert_eq!(one.len(), 6);
        assert!(zero.iter().all(|r| r.worker_id == WorkerId(0)));
        assert!(one.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(count(&handle).await.unwrap(), 10);

        assert!(worker_records(&handle, WorkerId(9)).await.unwrap().is_empty());
        handle.close().await.unwrap();
    }
}
