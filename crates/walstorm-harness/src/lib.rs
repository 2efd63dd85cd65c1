// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Worker pool and run orchestration for the Walstorm harness.
//!
//! [`WorkerPool`] releases every worker at once against a single SQLite store;
//! [`Orchestrator`] wraps it with schema setup and the final aggregation.

pub mod orchestrator;
pub mod pool;

pub use orchestrator::{Orchestrator, RunReport};
pub use pool::WorkerPool;
