// SPDX-FileCopyrightText: 2026 Walstorm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as a non-empty store location and a non-zero worker count.

use crate::diagnostic::ConfigError;
use crate::model::WalstormConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &WalstormConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.store.location.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "store.location must not be empty".to_string(),
        });
    }

    if config.pool.workers == 0 {
        errors.push(ConfigError::Validation {
            message: "pool.workers must be at least 1".to_string(),
        });
    }

    if config.pool.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "pool.timeout_secs must be greater than 0".to_string(),
        });
    }

    let level = config.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log_level `{}` is not one of {}",
                config.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&WalstormConfig::default()).is_ok());
    }

    #[test]
    fn zero_busy_timeout_is_allowed() {
        let mut config = WalstormConfig::default();
        config.store.busy_timeout_ms = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn collects_every_violation() {
        let mut config = WalstormConfig::default();
        config.store.location = "  ".to_string();
        config.pool.workers = 0;
        config.pool.timeout_secs = 0;
        config.log_level = "loud".to_string();

        let errors = validate_config(&config).expect_err("should fail");
        assert_eq!(errors.len(), 4);
        assert!(errors[0].to_string().contains("store.location"));
        assert!(errors[1].to_string().contains("pool.workers"));
        assert!(errors[2].to_string().contains("pool.timeout_secs"));
        assert!(errors[3].to_string().contains("loud"));
    }
}
