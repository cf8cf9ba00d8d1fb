// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! On-disk credential record and its atomic persistence.
//!
//! ```json
//! {
//!   "password_hash": "$argon2id$v=19$...",
//!   "salt": "<base64, 16 bytes>",
//!   "encrypted_data": "<base64, version || nonce || ciphertext || tag>",
//!   "kdf_iterations": 100000
//! }
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use photel_config::model::MIN_KDF_ITERATIONS;
use photel_core::PhotelError;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::kdf::SALT_LEN;

/// The persisted form of one credential set. Replaced wholesale on every save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub password_hash: String,
    pub salt: String,
    pub encrypted_data: String,
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,
}

fn default_kdf_iterations() -> u32 {
    MIN_KDF_ITERATIONS
}

impl CredentialRecord {
    pub fn new(
        password_hash: String,
        salt: &[u8; SALT_LEN],
        sealed: &[u8],
        kdf_iterations: u32,
    ) -> Self {
        Self {
            password_hash,
            salt: STANDARD.encode(salt),
            encrypted_data: STANDARD.encode(sealed),
            kdf_iterations,
        }
    }

    /// Decoded encryption salt. Anything other than 16 bytes is corrupt.
    pub fn salt_bytes(&self) -> Result<[u8; SALT_LEN], PhotelError> {
        let bytes = STANDARD
            .decode(&self.salt)
            .map_err(|e| PhotelError::corrupt(format!("salt is not valid base64: {e}")))?;
        <[u8; SALT_LEN]>::try_from(bytes.as_slice()).map_err(|_| {
            PhotelError::corrupt(format!(
                "salt must be {SALT_LEN} bytes, found {}",
                bytes.len()
            ))
        })
    }

    /// Decoded sealed payload.
    pub fn sealed_bytes(&self) -> Result<Vec<u8>, PhotelError> {
        STANDARD
            .decode(&self.encrypted_data)
            .map_err(|e| PhotelError::corrupt(format!("encrypted_data is not valid base64: {e}")))
    }
}

fn persistence<E>(message: impl Into<String>, source: E) -> PhotelError
where
    E: std::error::Error + Send + Sync + 'static,
{
    PhotelError::Persistence {
        message: message.into(),
        source: Some(Box::new(source)),
    }
}

/// Read and parse the record at `path`.
///
/// A missing file and a file holding only whitespace are both "not found";
/// that is what an interrupted first run leaves behind.
pub fn read_record(path: &Path) -> Result<CredentialRecord, PhotelError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(PhotelError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
            return Err(PhotelError::CorruptConfig {
                message: "record is not valid UTF-8".to_string(),
                source: Some(Box::new(e)),
            });
        }
        Err(e) => {
            return Err(persistence(
                format!("failed to read {}", path.display()),
                e,
            ));
        }
    };

    if contents.trim().is_empty() {
        return Err(PhotelError::NotFound {
            path: path.to_path_buf(),
        });
    }

    serde_json::from_str(&contents).map_err(|e| PhotelError::CorruptConfig {
        message: "record is not valid JSON".to_string(),
        source: Some(Box::new(e)),
    })
}

/// Atomically replace the record at `path`.
///
/// The JSON goes to a temporary file in the same directory, which is synced
/// and then renamed over the target. A failure at any step leaves the
/// previous record untouched.
pub fn write_record(path: &Path, record: &CredentialRecord) -> Result<(), PhotelError> {
    let parent = parent_dir(path);
    std::fs::create_dir_all(&parent)
        .map_err(|e| persistence(format!("failed to create {}", parent.display()), e))?;

    let json = serde_json::to_vec_pretty(record)
        .map_err(|e| persistence("failed to serialize record", e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(&parent)
        .map_err(|e| persistence(format!("failed to create temp file in {}", parent.display()), e))?;
    tmp.write_all(&json)
        .map_err(|e| persistence("failed to write temp file", e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| persistence("failed to sync temp file", e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(0o600))
            .map_err(|e| persistence("failed to restrict record permissions", e))?;
    }

    tmp.persist(path).map_err(|e| {
        error!(path = %path.display(), error = %e.error, "failed to replace credential record");
        persistence(format!("failed to replace {}", path.display()), e.error)
    })?;

    debug!(path = %path.display(), "credential record written");
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
