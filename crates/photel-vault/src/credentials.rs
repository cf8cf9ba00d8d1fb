// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The decrypted credential set.

use photel_core::PhotelError;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Bot token, destination channel, and artifact directory.
///
/// Exists in memory only; the store serializes it to JSON and encrypts it
/// before anything reaches disk. Fields are zeroed on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    pub api_token: String,
    pub channel_id: String,
    pub save_path: String,
}

impl Credentials {
    pub fn new(
        api_token: impl Into<String>,
        channel_id: impl Into<String>,
        save_path: impl Into<String>,
    ) -> Self {
        Self {
            api_token: api_token.into(),
            channel_id: channel_id.into(),
            save_path: save_path.into(),
        }
    }

    /// Rejects a credential set with any blank field.
    pub fn validate(&self) -> Result<(), PhotelError> {
        let missing: Vec<&str> = [
            ("api_token", &self.api_token),
            ("channel_id", &self.channel_id),
            ("save_path", &self.save_path),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(PhotelError::Config(format!(
                "all fields are required (missing: {})",
                missing.join(", ")
            )))
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &mask_secret(&self.api_token))
            .field("channel_id", &self.channel_id)
            .field("save_path", &self.save_path)
            .finish()
    }
}

/// Mask a secret for display: first four and last four characters, or
/// `****` when the value is too short to reveal anything.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}
