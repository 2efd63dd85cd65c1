// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Walstorm harness.

use std::time::Duration;

use thiserror::Error;

use crate::types::WorkerId;

/// Boxed error used as the `source` of storage failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type used across the workspace.
///
/// Per-worker write failures travel as [`WriteError`] and are collected by the
/// worker pool; every other variant is fatal to a run.
#[derive(Debug, Error)]
pub enum WalstormError {
    /// Configuration errors (invalid values, unknown keys, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// The store could not be opened or configured.
    #[error("cannot open store at {location}: {source}")]
    Connection { location: String, source: BoxError },

    /// Creating the record relation failed.
    #[error("schema initialization failed: {source}")]
    Schema { source: BoxError },

    /// A worker's batch failed.
    #[error(transparent)]
    Write(#[from] WriteError),

    /// The summary query failed or returned unreadable data.
    #[error("aggregation failed: {source}")]
    Aggregation { source: BoxError },

    /// Store failures outside the categories above (close, record read-back).
    #[error("storage error: {source}")]
    Storage { source: BoxError },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// A batch failure, tagged with the worker that observed it.
#[derive(Debug, Error)]
#[error("worker {worker_id} failed: {cause}")]
pub struct WriteError {
    pub worker_id: WorkerId,
    #[source]
    pub cause: WriteCause,
}

impl WriteError {
    pub fn new(worker_id: WorkerId, cause: WriteCause) -> Self {
        Self { worker_id, cause }
    }

    /// True when the store gave up waiting for the write lock.
    pub fn is_contention_timeout(&self) -> bool {
        matches!(self.cause, WriteCause::ContentionTimeout { .. })
    }
}

/// Why a batch failed.
#[derive(Debug, Error)]
pub enum WriteCause {
    /// The worker could not open its own store handle.
    #[error("could not open store: {0}")]
    Connection(#[source] BoxError),

    /// The write lock was still held when the busy-wait ceiling expired.
    #[error("write lock still held after busy-wait ceiling of {ceiling:?}")]
    ContentionTimeout { ceiling: Duration, source: BoxError },

    /// A constraint or trigger rejected a row.
    #[error("constraint violated: {source}")]
    Constraint { source: BoxError },

    /// Any other store or I/O failure while staging, executing or committing.
    #[error("store failure: {source}")]
    Store { source: BoxError },

    /// The store confirmed fewer rows than were submitted. The batch is rolled back.
    #[error("store confirmed {affected} of {attempted} rows")]
    Shortfall { attempted: u32, affected: u32 },

    /// The worker task died before reporting a result.
    #[error("worker task aborted: {0}")]
    Aborted(String),
}
