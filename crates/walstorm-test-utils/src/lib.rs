// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Walstorm integration tests.
//!
//! # Components
//!
//! - [`TestStore`] - temp-directory store fixture with a matching config
//! - [`WriteLockHolder`] - holds the write lock from a foreign connection
//! - [`inject`] - triggers that make chosen rows fail or be ignored

pub mod fixture;
pub mod inject;
pub mod lock;

pub use fixture::{TestStore, TestStoreBuilder};
pub use lock::WriteLockHolder;
