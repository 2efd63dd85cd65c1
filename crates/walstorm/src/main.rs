// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Walstorm - concurrent write-contention harness for a WAL-mode SQLite store.
//!
//! This is the binary entry point. It takes up to three positional arguments
//! (store location, worker count, rows per worker), runs one harness pass and
//! prints the per-worker results followed by the per-worker summary.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod report;

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::error;
use walstorm_config::WalstormConfig;
use walstorm_harness::Orchestrator;

/// Walstorm - concurrent write-contention harness for a WAL-mode SQLite store.
#[derive(Parser, Debug)]
#[command(name = "walstorm", version, about, long_about = None)]
struct Cli {
    /// Path of the SQLite store [default: example.db]
    location: Option<String>,

    /// Number of concurrent workers [default: 1]
    workers: Option<u32>,

    /// Rows inserted by each worker [default: 100]
    iterations: Option<u32>,
}

/// Positional arguments shaped as a config overlay; absent ones keep defaults.
#[derive(Serialize)]
struct ArgsOverlay {
    store: StoreOverlay,
    pool: PoolOverlay,
}

#[derive(Serialize)]
struct StoreOverlay {
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
}

#[derive(Serialize)]
struct PoolOverlay {
    #[serde(skip_serializing_if = "Option::is_none")]
    workers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    iterations: Option<u32>,
}

impl Cli {
    fn overlay(&self) -> ArgsOverlay {
        ArgsOverlay {
            store: StoreOverlay {
                location: self.location.clone(),
            },
            pool: PoolOverlay {
                workers: self.workers,
                iterations: self.iterations,
            },
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match walstorm_config::load_and_validate_with(&cli.overlay()) {
        Ok(config) => config,
        Err(errors) => {
            walstorm_config::render_errors(&errors);
            return ExitCode::from(1);
        }
    };

    init_tracing(&config.log_level);
    run(config).await
}

/// Run one pass. Exit status: 0 when every worker committed, 2 when any
/// worker failed or was abandoned, 1 on a fatal error.
async fn run(config: WalstormConfig) -> ExitCode {
    let result = Orchestrator::new(config)
        .run_with(report::print_outcome)
        .await;

    match result {
        Ok(run) => {
            report::print_summary(&run.summary);
            println!("done.");
            if run.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
        Err(e) => {
            error!(error = %e, "run aborted");
            eprintln!("walstorm: {e}");
            ExitCode::from(1)
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so stdout carries only the report.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("walstorm={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
