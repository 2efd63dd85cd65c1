// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row-level failure injection via `BEFORE INSERT` triggers.
//!
//! The record relation must already exist.

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;
use walstorm_core::{RECORD_TABLE, WorkerId};

/// Make the insert of `payload` for `worker_id` abort its statement.
pub fn abort_row(path: &Path, worker_id: WorkerId, payload: &str) -> rusqlite::Result<()> {
    install(path, "abort", worker_id, payload, "RAISE(ABORT, 'injected row failure')")
}

/// Make the insert of `payload` for `worker_id` silently skip, so the store
/// reports zero affected rows for it.
pub fn ignore_row(path: &Path, worker_id: WorkerId, payload: &str) -> rusqlite::Result<()> {
    install(path, "ignore", worker_id, payload, "RAISE(IGNORE)")
}

fn install(
    path: &Path,
    kind: &str,
    worker_id: WorkerId,
    payload: &str,
    action: &str,
) -> rusqlite::Result<()> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(Duration::from_secs(5))?;
    let name = format!("inject_{kind}_{}_{}", worker_id.0, sanitize(payload));
    let payload = payload.replace('\'', "''");
    conn.execute_batch(&format!(
        "CREATE TRIGGER IF NOT EXISTS {name} BEFORE INSERT ON {RECORD_TABLE}
         WHEN NEW.worker_id = {id} AND NEW.payload = '{payload}'
         BEGIN SELECT {action}; END;",
        id = worker_id.0,
    ))
}

fn sanitize(payload: &str) -> String {
    payload
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
