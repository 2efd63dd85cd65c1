// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Console report lines.
//!
//! Completed batches and summary rows go to stdout; failed and abandoned
//! workers go to stderr.

use walstorm_core::{AggregateRow, WorkerOutcome};

/// Line printed when a worker reaches its terminal state.
pub fn outcome_line(outcome: &WorkerOutcome) -> String {
    match outcome {
        WorkerOutcome::Completed(result) => {
            format!("result worker {}, count={:5}", result.worker_id, result.affected)
        }
        WorkerOutcome::Failed(err) => format!("failed worker {}: {}", err.worker_id, err.cause),
        WorkerOutcome::Incomplete { worker_id } => {
            format!("incomplete worker {worker_id}: still running at pool deadline")
        }
    }
}

/// Line printed for one aggregate group.
pub fn summary_line(row: &AggregateRow) -> String {
    format!(
        "worker {} = {:5} {}",
        row.worker_id,
        row.count,
        row.latest_recorded_at.format("%Y-%m-%d %H:%M:%S%.3f")
    )
}

pub fn print_outcome(outcome: &WorkerOutcome) {
    let line = outcome_line(outcome);
    if outcome.is_completed() {
        println!("{line}");
    } else {
        eprintln!("{line}");
    }
}

pub fn print_summary(rows: &[AggregateRow]) {
    for row in rows {
        println!("{}", summary_line(row));
    }
}

#[cfg(test)]
mod tests {
    use walstorm_core::{BatchResult, WorkerId, WriteCause, WriteError};

    use super::*;

    #[test]
    fn completed_line_pads_worker_and_count() {
        let outcome = WorkerOutcome::Completed(BatchResult {
            worker_id: WorkerId(3),
            attempted: 100,
            affected: 100,
        });
        assert_eq!(outcome_line(&outcome), "result worker 003, count=  100");
    }

    #[test]
    fn failed_line_names_cause() {
        let outcome = WorkerOutcome::Failed(WriteError::new(
            WorkerId(12),
            WriteCause::Shortfall {
                attempted: 5,
                affected: 4,
            },
        ));
        assert_eq!(
            outcome_line(&outcome),
            "failed worker 012: store confirmed 4 of 5 rows"
        );
    }

    #[test]
    fn summary_line_formats_timestamp() {
        let row = AggregateRow {
            worker_id: WorkerId(0),
            count: 42,
            latest_recorded_at: "2026-10-19T08:15:30.250Z".parse().unwrap(),
        };
        assert_eq!(summary_line(&row), "worker 000 =    42 2026-10-19 08:15:30.250");
    }
}
