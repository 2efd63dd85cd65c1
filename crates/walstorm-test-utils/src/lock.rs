// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Holding the store's write lock from outside the harness.
//!
//! Makes contention deterministic: while a [`WriteLockHolder`] is alive every
//! other writer must wait in SQLite's busy handler.

use std::path::Path;

use rusqlite::Connection;

/// A connection parked inside an open `BEGIN IMMEDIATE` transaction.
pub struct WriteLockHolder {
    conn: Option<Connection>,
}

impl WriteLockHolder {
    /// Switch the file to WAL (if it is not already) and take the write lock.
    pub fn acquire(path: &Path) -> rusqlite::Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;
        conn.execute_batch("BEGIN IMMEDIATE")?;
        tracing::debug!(path = %path.display(), "external write lock acquired");
        Ok(Self { conn: Some(conn) })
    }

    /// Commit the empty transaction, releasing the lock.
    pub fn release(mut self) -> rusqlite::Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.execute_batch("COMMIT")?;
        }
        Ok(())
    }
}

impl Drop for WriteLockHolder {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            let _ = conn.execute_batch("ROLLBACK");
        }
    }
}
