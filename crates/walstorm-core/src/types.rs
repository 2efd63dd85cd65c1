// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared between the storage layer, the worker pool and the binary.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WriteError;

/// Name of the relation every worker appends to.
pub const RECORD_TABLE: &str = "testtbl";

/// Width of the zero-padded payload written for each row.
pub const PAYLOAD_WIDTH: usize = 5;

/// Identity of one worker within a pool run (`0..worker_count`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(pub u32);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// The unit of work handed to one batch writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerTask {
    pub worker_id: WorkerId,
    pub iteration_count: u32,
}

impl WorkerTask {
    pub fn new(worker_id: WorkerId, iteration_count: u32) -> Self {
        Self {
            worker_id,
            iteration_count,
        }
    }

    /// Payloads for every row of this task, in submission order.
    pub fn payloads(&self) -> impl Iterator<Item = String> {
        (0..self.iteration_count).map(payload_for)
    }
}

/// Format the payload written for loop index `idx`.
pub fn payload_for(idx: u32) -> String {
    format!("{idx:0width$}", width = PAYLOAD_WIDTH)
}

/// What a batch writer reports after committing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub worker_id: WorkerId,
    /// Rows submitted (the task's iteration count).
    pub attempted: u32,
    /// Rows the store confirmed as inserted.
    pub affected: u32,
}

/// One persisted row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub worker_id: WorkerId,
    pub payload: String,
    pub recorded_at: DateTime<Utc>,
}

/// Per-worker summary computed by the grouping query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub worker_id: WorkerId,
    pub count: u64,
    pub latest_recorded_at: DateTime<Utc>,
}

/// Terminal state of one worker after the pool drains.
#[derive(Debug)]
pub enum WorkerOutcome {
    /// The batch committed.
    Completed(BatchResult),
    /// The batch failed and was rolled back.
    Failed(WriteError),
    /// The worker was still running when the pool deadline passed.
    Incomplete { worker_id: WorkerId },
}

impl WorkerOutcome {
    pub fn worker_id(&self) -> WorkerId {
        match self {
            Self::Completed(result) => result.worker_id,
            Self::Failed(err) => err.worker_id,
            Self::Incomplete { worker_id } => *worker_id,
        }
    }

    /// Rows confirmed by this worker; zero unless the batch committed.
    pub fn affected(&self) -> u64 {
        match self {
            Self::Completed(result) => u64::from(result.affected),
            _ => 0,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}
