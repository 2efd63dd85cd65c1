// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Idempotent creation of the record relation.

use tracing::debug;
use walstorm_core::{RECORD_TABLE, WalstormError};

use crate::database::StoreHandle;

/// DDL for the record relation. `recorded_at` defaults to the store's UTC
/// clock with millisecond precision (RFC 3339).
pub fn create_table_sql() -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {RECORD_TABLE} (
            id          INTEGER PRIMARY KEY,
            worker_id   INTEGER NOT NULL,
            payload     TEXT    NOT NULL,
            recorded_at TEXT    NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )"
    )
}

/// Create the record relation if it does not exist yet.
///
/// Safe to call repeatedly and from several handles at once.
pub async fn ensure_schema(handle: &StoreHandle) -> Result<(), WalstormError> {
    let ddl = create_table_sql();
    handle
        .connection()
        .call(move |conn| -> Result<(), rusqlite::Error> { conn.execute_batch(&ddl) })
        .await
        .map_err(|e| WalstormError::Schema {
            source: Box::new(e),
        })?;
    debug!(location = %handle.location(), table = RECORD_TABLE, "record relation ready");
    Ok(())
}
