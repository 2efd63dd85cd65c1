// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Walstorm write-contention harness.
//!
//! This crate provides the error types and the domain types (worker tasks,
//! batch results, records and aggregate rows) shared by the storage layer,
//! the worker pool and the binary.

pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{BoxError, WalstormError, WriteCause, WriteError};
pub use types::{
    AggregateRow, BatchResult, PAYLOAD_WIDTH, RECORD_TABLE, Record, WorkerId, WorkerOutcome,
    WorkerTask, payload_for,
};
