// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Photel.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error source carried by several variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type used across the credential store, the delivery
/// pipeline, and channel adapters.
///
/// Credential errors are split by recoverability so callers can branch on
/// them: a wrong password can be retried, a missing record means first run,
/// a corrupt record has to be reconfigured.
#[derive(Debug, Error)]
pub enum PhotelError {
    /// Configuration errors (invalid TOML, out-of-range values, empty fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// No credential record exists yet.
    #[error("no stored configuration found at {}", path.display())]
    NotFound { path: PathBuf },

    /// The password did not match the stored verifier.
    #[error("invalid password")]
    InvalidPassword,

    /// The record exists and the password is correct, but the payload is unreadable.
    #[error("stored configuration is corrupt: {message}")]
    CorruptConfig {
        message: String,
        source: Option<BoxError>,
    },

    /// Writing (or reading) the credential record failed at the filesystem level.
    #[error("persistence error: {message}")]
    Persistence {
        message: String,
        source: Option<BoxError>,
    },

    /// The delivery channel rejected a request or could not be reached.
    #[error("channel protocol error: {message}")]
    Protocol {
        message: String,
        source: Option<BoxError>,
    },

    /// Authenticated decryption failed: wrong key, truncated or tampered ciphertext.
    #[error("integrity check failed: wrong key or tampered ciphertext")]
    Integrity,

    /// An artifact file could not be read for delivery.
    #[error("artifact {} unreadable: {source}", path.display())]
    Artifact {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The delivery worker has exited and no longer accepts items.
    #[error("delivery queue is closed")]
    QueueClosed,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PhotelError {
    /// Shorthand for a [`PhotelError::CorruptConfig`] without a source.
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::CorruptConfig {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a [`PhotelError::Protocol`] wrapping its cause.
    pub fn protocol<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Protocol {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns true when the root cause of a corrupt record is a failed
    /// authenticated decryption.
    pub fn is_integrity_failure(&self) -> bool {
        match self {
            Self::Integrity => true,
            Self::CorruptConfig {
                source: Some(source),
                ..
            } => matches!(
                source.downcast_ref::<PhotelError>(),
                Some(PhotelError::Integrity)
            ),
            _ => false,
        }
    }

    /// An actionable, user-facing message for the credential flow.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "No configuration yet. Run `photel setup` first.",
            Self::InvalidPassword => "Wrong password. Try again.",
            Self::CorruptConfig { .. } | Self::Integrity => {
                "The stored configuration is damaged. Run `photel setup` to recreate it."
            }
            Self::Persistence { .. } => {
                "The configuration file could not be written or read. Check permissions and disk space."
            }
            Self::Protocol { .. } => {
                "The bot API rejected the request. Check the token, channel id and network."
            }
            Self::Config(_) => "Fix the configuration value and try again.",
            Self::Artifact { .. } | Self::QueueClosed | Self::Internal(_) => {
                "Unexpected failure. Re-run with RUST_LOG=photel=debug for details."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrity_is_detected_through_corrupt_config() {
        let err = PhotelError::CorruptConfig {
            message: "decryption failed".into(),
            source: Some(Box::new(PhotelError::Integrity)),
        };
        assert!(err.is_integrity_failure());
        assert!(!PhotelError::corrupt("bad json").is_integrity_failure());
        assert!(!PhotelError::InvalidPassword.is_integrity_failure());
    }

    #[test]
    fn credential_errors_have_distinct_hints() {
        let not_found = PhotelError::NotFound {
            path: PathBuf::from("/tmp/config.json"),
        };
        let hints = [
            not_found.hint(),
            PhotelError::InvalidPassword.hint(),
            PhotelError::corrupt("x").hint(),
        ];
        assert_ne!(hints[0], hints[1]);
        assert_ne!(hints[1], hints[2]);
        assert_ne!(hints[0], hints[2]);
    }

    #[test]
    fn not_found_display_mentions_path() {
        let err = PhotelError::NotFound {
            path: PathBuf::from("/var/lib/photel/config.json"),
        };
        assert!(err.to_string().contains("/var/lib/photel/config.json"));
    }
}
