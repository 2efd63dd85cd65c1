// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite WAL storage layer for the Walstorm harness.
//!
//! Provides the store handle (WAL journal, relaxed sync, busy-wait ceiling),
//! idempotent schema creation, the per-worker batch writer and the grouping
//! query used to verify a run.

pub mod aggregate;
pub mod database;
pub mod models;
pub mod queries;
pub mod schema;
pub mod writer;

pub use aggregate::{summarize, summarize_with};
pub use database::StoreHandle;
pub use models::*;
pub use schema::ensure_schema;
pub use writer::run_batch;
