// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `walstorm-core::types` so they can cross
//! into the worker pool and the binary. This module re-exports them for
//! convenience within the storage crate.

pub use walstorm_core::types::{AggregateRow, BatchResult, Record, WorkerId, WorkerTask};
