// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Photel.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Photel configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PhotelConfig {
    /// Application-wide settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Credential vault settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Delivery queue and retry settings.
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Telegram Bot API settings.
    #[serde(default)]
    pub telegram: TelegramConfig,
}

/// Application-wide configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Credential vault configuration.
///
/// The encryption key comes from PBKDF2-HMAC-SHA256; the password verifier is
/// a separate Argon2id hash with its own salt.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Location of the encrypted credential record.
    #[serde(default = "default_record_path")]
    pub record_path: PathBuf,

    /// PBKDF2 iteration count for new records (default: 100000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Argon2id memory cost in KiB for the password verifier (default: 19456).
    #[serde(default = "default_verifier_memory_cost")]
    pub verifier_memory_cost: u32,

    /// Argon2id iteration count for the password verifier (default: 2).
    #[serde(default = "default_verifier_iterations")]
    pub verifier_iterations: u32,

    /// Argon2id parallelism lanes for the password verifier (default: 1).
    #[serde(default = "default_verifier_parallelism")]
    pub verifier_parallelism: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            record_path: default_record_path(),
            kdf_iterations: default_kdf_iterations(),
            verifier_memory_cost: default_verifier_memory_cost(),
            verifier_iterations: default_verifier_iterations(),
            verifier_parallelism: default_verifier_parallelism(),
        }
    }
}

/// Minimum PBKDF2 iteration count accepted by validation.
pub const MIN_KDF_ITERATIONS: u32 = 100_000;

/// Maximum PBKDF2 iteration count accepted by validation and by record loading.
pub const MAX_KDF_ITERATIONS: u32 = 10_000_000;

fn default_record_path() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("photel").join("config.json"))
        .unwrap_or_else(|| PathBuf::from("config.json"))
}

fn default_kdf_iterations() -> u32 {
    MIN_KDF_ITERATIONS
}

fn default_verifier_memory_cost() -> u32 {
    19_456 // 19 MiB
}

fn default_verifier_iterations() -> u32 {
    2
}

fn default_verifier_parallelism() -> u32 {
    1
}

/// Delivery queue configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeliveryConfig {
    /// Attempts per artifact before it is moved to the holding directory.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay after the first failed attempt; doubles on every further failure.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Upper bound for a single backoff delay.
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,

    /// How long the worker waits on an empty queue before re-checking for stop.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Attempts to delete a delivered artifact.
    #[serde(default = "default_delete_attempts")]
    pub delete_attempts: u32,

    /// Delay between delete attempts.
    #[serde(default = "default_delete_delay_ms")]
    pub delete_delay_ms: u64,

    /// Name of the holding directory created under the save path.
    #[serde(default = "default_holding_dir_name")]
    pub holding_dir_name: String,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            delete_attempts: default_delete_attempts(),
            delete_delay_ms: default_delete_delay_ms(),
            holding_dir_name: default_holding_dir_name(),
        }
    }
}

impl DeliveryConfig {
    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    pub fn backoff_max(&self) -> Duration {
        Duration::from_millis(self.backoff_max_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn delete_delay(&self) -> Duration {
        Duration::from_millis(self.delete_delay_ms)
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    1_000
}

fn default_backoff_max_ms() -> u64 {
    60_000
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_delete_attempts() -> u32 {
    3
}

fn default_delete_delay_ms() -> u64 {
    1_000
}

fn default_holding_dir_name() -> String {
    "unsent".to_string()
}

/// Telegram Bot API configuration.
///
/// The bot token and channel id live in the encrypted credential record,
/// never in this file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Base URL of a self-hosted Bot API server. `None` uses api.telegram.org.
    #[serde(default)]
    pub api_url: Option<String>,
}
