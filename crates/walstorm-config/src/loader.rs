// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Compiled defaults are always the bottom layer. On top of them sits either a
//! TOML document (string or file) or a serializable overlay such as the
//! binary's positional arguments. No environment variables are consulted.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::Serialize;
use tracing::debug;

use crate::model::WalstormConfig;

/// Load configuration from a TOML string merged over the defaults.
pub fn load_config_from_str(toml_content: &str) -> Result<WalstormConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WalstormConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a TOML file merged over the defaults.
pub fn load_config_from_path(path: &Path) -> Result<WalstormConfig, figment::Error> {
    debug!(path = %path.display(), "loading configuration file");
    Figment::new()
        .merge(Serialized::defaults(WalstormConfig::default()))
        .merge(Toml::file(path))
        .extract()
}

/// Load configuration from a serializable overlay merged over the defaults.
///
/// Fields the overlay omits (for example `Option::None` fields skipped during
/// serialization) keep their default values.
pub fn load_config_with<T: Serialize>(overlay: &T) -> Result<WalstormConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WalstormConfig::default()))
        .merge(Serialized::defaults(overlay))
        .extract()
}
