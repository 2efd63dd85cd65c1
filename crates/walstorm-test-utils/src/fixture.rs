// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temp-directory store fixture.
//!
//! `TestStore` owns a temporary directory holding one SQLite file and a
//! matching [`StoreConfig`]. The directory is removed when the fixture drops.

use std::path::{Path, PathBuf};

use walstorm_config::{PoolConfig, StoreConfig, WalstormConfig};
use walstorm_core::WalstormError;

/// Builder for creating isolated store fixtures.
pub struct TestStoreBuilder {
    busy_timeout_ms: u64,
    file_name: String,
}

impl TestStoreBuilder {
    fn new() -> Self {
        Self {
            busy_timeout_ms: 10_000,
            file_name: "test.db".to_string(),
        }
    }

    /// Set the busy-wait ceiling used by every handle opened from this fixture.
    pub fn busy_timeout_ms(mut self, ms: u64) -> Self {
        self.busy_timeout_ms = ms;
        self
    }

    /// Set the database file name inside the temp directory.
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Create the temp directory. The database file itself is created by the
    /// first handle opened against it.
    pub fn build(self) -> Result<TestStore, WalstormError> {
        let dir = tempfile::TempDir::new().map_err(|e| WalstormError::Storage { source: e.into() })?;
        let path = dir.path().join(&self.file_name);
        let config = StoreConfig {
            location: path.to_string_lossy().to_string(),
            busy_timeout_ms: self.busy_timeout_ms,
            ..StoreConfig::default()
        };
        tracing::debug!(path = %path.display(), "test store created");
        Ok(TestStore {
            _dir: dir,
            path,
            config,
        })
    }
}

/// An isolated on-disk store location for one test.
pub struct TestStore {
    _dir: tempfile::TempDir,
    path: PathBuf,
    config: StoreConfig,
}

impl TestStore {
    pub fn builder() -> TestStoreBuilder {
        TestStoreBuilder::new()
    }

    /// Fixture with default settings.
    pub fn new() -> Result<Self, WalstormError> {
        Self::builder().build()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// A full harness configuration pointing at this store.
    pub fn harness_config(&self, workers: u32, iterations: u32) -> WalstormConfig {
        WalstormConfig {
            store: self.config.clone(),
            pool: PoolConfig {
                workers,
                iterations,
                ..PoolConfig::default()
            },
            ..WalstormConfig::default()
        }
    }
}
