// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Walstorm harness.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys, providing actionable error messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Top-level Walstorm configuration.
///
/// Every field has a default, so an empty document is a valid configuration
/// equivalent to running the binary with no arguments.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WalstormConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Store location and connection pragmas.
    #[serde(default)]
    pub store: StoreConfig,

    /// Worker pool sizing and drain deadline.
    #[serde(default)]
    pub pool: PoolConfig,
}

impl Default for WalstormConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            store: StoreConfig::default(),
            pool: PoolConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// SQLite journal mode. Values map 1:1 to `PRAGMA journal_mode` settings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, Display, EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum JournalMode {
    /// Write-ahead log: writers append, readers keep their snapshot.
    #[default]
    Wal,
    /// Rollback journal deleted at commit.
    Delete,
    /// Rollback journal truncated at commit.
    Truncate,
}

impl JournalMode {
    /// Returns the SQLite pragma value.
    pub fn pragma_value(self) -> &'static str {
        self.into()
    }
}

/// SQLite sync mode. Values map 1:1 to `PRAGMA synchronous` settings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, Display, EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum SynchronousMode {
    /// Hand writes to the OS without waiting for fsync.
    #[default]
    Off,
    Normal,
    Full,
}

impl SynchronousMode {
    /// Returns the SQLite pragma value.
    pub fn pragma_value(self) -> &'static str {
        self.into()
    }
}

/// Store location and per-connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_location")]
    pub location: String,

    /// Journal mode requested on every open.
    #[serde(default)]
    pub journal_mode: JournalMode,

    /// Sync mode applied on every open.
    #[serde(default)]
    pub synchronous: SynchronousMode,

    /// How long a connection blocks on a held lock before reporting it, in
    /// milliseconds. Zero disables waiting entirely.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl StoreConfig {
    /// Config for `location` with every other field at its default.
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    /// The busy-wait ceiling as a [`Duration`].
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
            journal_mode: JournalMode::default(),
            synchronous: SynchronousMode::default(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_location() -> String {
    "example.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    10_000
}

/// Worker pool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PoolConfig {
    /// Number of concurrent workers.
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Rows each worker inserts.
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Seconds to wait for the pool to drain before abandoning stragglers.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl PoolConfig {
    /// The drain deadline as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            iterations: default_iterations(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_workers() -> u32 {
    1
}

fn default_iterations() -> u32 {
    100
}

fn default_timeout_secs() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn pragma_values_are_uppercase() {
        assert_eq!(JournalMode::Wal.pragma_value(), "WAL");
        assert_eq!(JournalMode::Truncate.pragma_value(), "TRUNCATE");
        assert_eq!(SynchronousMode::Off.pragma_value(), "OFF");
        assert_eq!(SynchronousMode::Full.to_string(), "FULL");
    }

    #[test]
    fn modes_parse_case_insensitively() {
        assert_eq!(JournalMode::from_str("wal").unwrap(), JournalMode::Wal);
        assert_eq!(
            SynchronousMode::from_str("Normal").unwrap(),
            SynchronousMode::Normal
        );
        assert!(JournalMode::from_str("memory").is_err());
    }

    #[test]
    fn durations_follow_fields() {
        let store = StoreConfig {
            busy_timeout_ms: 250,
            ..StoreConfig::default()
        };
        assert_eq!(store.busy_timeout(), Duration::from_millis(250));
        assert_eq!(PoolConfig::default().timeout(), Duration::from_secs(60));
    }

    #[test]
    fn store_at_keeps_defaults() {
        let store = StoreConfig::at("/tmp/x.db");
        assert_eq!(store.location, "/tmp/x.db");
        assert_eq!(store.journal_mode, JournalMode::Wal);
        assert_eq!(store.synchronous, SynchronousMode::Off);
        assert_eq!(store.busy_timeout_ms, 10_000);
    }
}
