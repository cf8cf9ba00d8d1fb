// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as minimum KDF costs, non-zero attempt counts, and plain directory names.

use crate::diagnostic::ConfigError;
use crate::model::{PhotelConfig, MAX_KDF_ITERATIONS, MIN_KDF_ITERATIONS};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Argon2 caps the number of lanes at 2^24 - 1.
const MAX_VERIFIER_PARALLELISM: u32 = 0x00FF_FFFF;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &PhotelConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.app.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.log_level `{}` must be one of {}",
                config.app.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    // Vault
    if config.vault.record_path.as_os_str().is_empty() {
        errors.push(ConfigError::Validation {
            message: "vault.record_path must not be empty".to_string(),
        });
    }

    if config.vault.kdf_iterations > MAX_KDF_ITERATIONS {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_iterations must be at most {MAX_KDF_ITERATIONS}, got {}",
                config.vault.kdf_iterations
            ),
        });
    }

    if config.vault.kdf_iterations < MIN_KDF_ITERATIONS {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_iterations must be at least {MIN_KDF_ITERATIONS}, got {}",
                config.vault.kdf_iterations
            ),
        });
    }

    if config.vault.verifier_parallelism > MAX_VERIFIER_PARALLELISM {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.verifier_parallelism must be at most {MAX_VERIFIER_PARALLELISM}, got {}",
                config.vault.verifier_parallelism
            ),
        });
    }

    if config.vault.verifier_parallelism < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.verifier_parallelism must be at least 1, got {}",
                config.vault.verifier_parallelism
            ),
        });
    }

    // Argon2 requires at least 8 KiB per lane.
    let min_memory = 8u32.saturating_mul(config.vault.verifier_parallelism.max(1));
    if config.vault.verifier_memory_cost < min_memory {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.verifier_memory_cost must be at least {min_memory} KiB, got {}",
                config.vault.verifier_memory_cost
            ),
        });
    }

    if config.vault.verifier_iterations < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.verifier_iterations must be at least 1, got {}",
                config.vault.verifier_iterations
            ),
        });
    }

    // Delivery
    if config.delivery.max_attempts < 1 {
        errors.push(ConfigError::Validation {
            message: "delivery.max_attempts must be at least 1".to_string(),
        });
    }

    if config.delivery.delete_attempts < 1 {
        errors.push(ConfigError::Validation {
            message: "delivery.delete_attempts must be at least 1".to_string(),
        });
    }

    if config.delivery.poll_interval_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "delivery.poll_interval_ms must be greater than 0".to_string(),
        });
    }

    if config.delivery.backoff_max_ms < config.delivery.backoff_base_ms {
        errors.push(ConfigError::Validation {
            message: format!(
                "delivery.backoff_max_ms ({}) must not be lower than delivery.backoff_base_ms ({})",
                config.delivery.backoff_max_ms, config.delivery.backoff_base_ms
            ),
        });
    }

    let holding = config.delivery.holding_dir_name.trim();
    if holding.is_empty()
        || holding == "."
        || holding == ".."
        || holding.contains('/')
        || holding.contains('\\')
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "delivery.holding_dir_name `{}` must be a plain directory name",
                config.delivery.holding_dir_name
            ),
        });
    }

    // Telegram
    if let Some(url) = &config.telegram.api_url {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(ConfigError::Validation {
                message: format!("telegram.api_url `{url}` must start with http:// or https://"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
