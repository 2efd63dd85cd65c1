// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store handle: one SQLite connection with its PRAGMA setup and lifecycle.
//!
//! Each handle owns a dedicated `tokio-rusqlite` background thread, so handles
//! opened by different workers really do contend for SQLite's write lock.
//! Contention is resolved only by SQLite's busy handler, armed here with the
//! configured ceiling.

use rusqlite::OpenFlags;
use tracing::{debug, warn};
use walstorm_config::StoreConfig;
use walstorm_core::WalstormError;

/// An open connection to the store.
///
/// Dropping the handle closes the connection thread; [`StoreHandle::close`]
/// does the same but reports close failures.
pub struct StoreHandle {
    conn: tokio_rusqlite::Connection,
    location: String,
    journal_mode: String,
}

impl StoreHandle {
    /// Open (creating if needed) the store for writing.
    ///
    /// Applies, in order: the busy-wait ceiling, the journal mode and the sync
    /// mode. The busy timeout goes first so the journal-mode switch itself
    /// waits for locks held by other openers.
    pub async fn open(config: &StoreConfig) -> Result<Self, WalstormError> {
        let conn = tokio_rusqlite::Connection::open(&config.location)
            .await
            .map_err(|e| connection_err(&config.location, e))?;
        Self::configure(conn, config, false).await
    }

    /// Open an existing store with read-only intent (`PRAGMA query_only`).
    ///
    /// Fails with a connection error if the file does not exist.
    pub async fn open_for_read(config: &StoreConfig) -> Result<Self, WalstormError> {
        let conn = tokio_rusqlite::Connection::open_with_flags(
            &config.location,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .await
        .map_err(|e| connection_err(&config.location, e))?;
        Self::configure(conn, config, true).await
    }

    async fn configure(
        conn: tokio_rusqlite::Connection,
        config: &StoreConfig,
        query_only: bool,
    ) -> Result<Self, WalstormError> {
        let busy_timeout = config.busy_timeout();
        let requested = config.journal_mode;
        let synchronous = config.synchronous;

        let journal_mode = conn
            .call(move |conn| -> Result<String, rusqlite::Error> {
                conn.busy_timeout(busy_timeout)?;
                let mode: String = conn.pragma_update_and_check(
                    None,
                    "journal_mode",
                    requested.pragma_value(),
                    |row| row.get(0),
                )?;
                conn.pragma_update(None, "synchronous", synchronous.pragma_value())?;
                if query_only {
                    conn.pragma_update(None, "query_only", true)?;
                }
                Ok(mode)
            })
            .await
            .map_err(|e| connection_err(&config.location, e))?;

        if !journal_mode.eq_ignore_ascii_case(requested.pragma_value()) {
            warn!(
                location = %config.location,
                requested = %requested,
                effective = %journal_mode,
                "store refused requested journal mode"
            );
        }

        debug!(
            location = %config.location,
            journal_mode = %journal_mode,
            synchronous = %synchronous,
            busy_timeout_ms = config.busy_timeout_ms,
            query_only,
            "store handle opened"
        );

        Ok(Self {
            conn,
            location: config.location.clone(),
            journal_mode,
        })
    }

    /// Returns the underlying connection for query modules.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Journal mode SQLite reported after the open-time switch (lowercase, e.g. `wal`).
    pub fn journal_mode(&self) -> &str {
        &self.journal_mode
    }

    /// Close the connection, waiting for its background thread to finish.
    pub async fn close(self) -> Result<(), WalstormError> {
        let location = self.location;
        self.conn.close().await.map_err(map_tr_err)?;
        debug!(location = %location, "store handle closed");
        Ok(())
    }
}

fn connection_err<E>(location: &str, e: E) -> WalstormError
where
    E: std::error::Error + Send + Sync + 'static,
{
    WalstormError::Connection {
        location: location.to_string(),
        source: Box::new(e),
    }
}

/// Convert a tokio-rusqlite error into `WalstormError::Storage`.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> WalstormError {
    WalstormError::Storage {
        source: Box::new(e),
    }
}
