// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./photel.toml` > `~/.config/photel/photel.toml` > `/etc/photel/photel.toml`
//! with environment variable overrides via `PHOTEL_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PhotelConfig;

/// Environment variables under this prefix override file settings.
pub const ENV_PREFIX: &str = "PHOTEL_";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/photel/photel.toml` (system-wide)
/// 3. `~/.config/photel/photel.toml` (user XDG config)
/// 4. `./photel.toml` (local directory)
/// 5. `PHOTEL_*` environment variables
pub fn load_config() -> Result<PhotelConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<PhotelConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PhotelConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PhotelConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PhotelConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PhotelConfig::default()))
        .merge(Toml::file("/etc/photel/photel.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("photel/photel.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("photel.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `PHOTEL_DELIVERY_MAX_ATTEMPTS` must map to
/// `delivery.max_attempts`, not `delivery.max.attempts`. `PHOTEL_PASSWORD`
/// is read by the passphrase prompt and is not a config key.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        .ignore(&["password"])
        .map(|key| {
            let key_str = key.as_str();
            let mapped = key_str
                .replacen("app_", "app.", 1)
                .replacen("vault_", "vault.", 1)
                .replacen("delivery_", "delivery.", 1)
                .replacen("telegram_", "telegram.", 1);
            mapped.into()
        })
}
