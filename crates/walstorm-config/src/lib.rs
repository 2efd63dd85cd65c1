// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Walstorm harness.
//!
//! Provides typed configuration with strict validation (`deny_unknown_fields`),
//! Figment layering of compiled defaults with TOML documents or argument
//! overlays, and miette diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use walstorm_config::load_and_validate_str;
//!
//! let config = load_and_validate_str("[pool]\nworkers = 4\n").expect("config errors");
//! println!("store: {}", config.store.location);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

use serde::Serialize;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config_from_path, load_config_from_str, load_config_with};
pub use model::{JournalMode, PoolConfig, StoreConfig, SynchronousMode, WalstormConfig};
pub use validation::validate_config;

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<WalstormConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            Some(("<inline>", toml_content)),
        )),
    }
}

/// Load configuration from a TOML file and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<WalstormConfig, Vec<ConfigError>> {
    match loader::load_config_from_path(path) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let content = std::fs::read_to_string(path).unwrap_or_default();
            let name = path.display().to_string();
            Err(diagnostic::figment_to_config_errors(
                err,
                Some((&name, &content)),
            ))
        }
    }
}

/// Merge an overlay (such as parsed command-line arguments) over the defaults
/// and validate the result.
pub fn load_and_validate_with<T: Serialize>(
    overlay: &T,
) -> Result<WalstormConfig, Vec<ConfigError>> {
    match loader::load_config_with(overlay) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, None)),
    }
}
