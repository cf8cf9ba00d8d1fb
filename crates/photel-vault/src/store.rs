// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password-protected credential store.
//!
//! Every save draws a fresh encryption salt, hashes the password into an
//! independent Argon2id verifier, derives an AES-256 key with PBKDF2 and seals
//! the credentials as JSON. Loading checks the verifier first, so a wrong
//! password is reported as such and never surfaces as a decryption failure.

use std::path::{Path, PathBuf};

use photel_config::model::{MAX_KDF_ITERATIONS, VaultConfig};
use photel_core::PhotelError;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::credentials::Credentials;
use crate::record::{CredentialRecord, read_record, write_record};
use crate::verifier::{VerifierParams, hash_password, verify_password};
use crate::{crypto, kdf};

/// Handle to the encrypted credential record at a fixed path.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
    kdf_iterations: u32,
    verifier: VerifierParams,
}

impl CredentialStore {
    /// Store at `path` using the cost parameters from `config` for new records.
    pub fn new(path: impl Into<PathBuf>, config: &VaultConfig) -> Self {
        Self {
            path: path.into(),
            kdf_iterations: config.kdf_iterations,
            verifier: VerifierParams::from_config(config),
        }
    }

    /// Store at the configured `record_path`.
    pub fn from_config(config: &VaultConfig) -> Self {
        Self::new(config.record_path.clone(), config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a non-empty record file is present.
    pub fn exists(&self) -> bool {
        std::fs::metadata(&self.path)
            .map(|meta| meta.is_file() && meta.len() > 0)
            .unwrap_or(false)
    }

    /// Encrypt `credentials` under `password` and replace the record.
    pub fn save(
        &self,
        credentials: &Credentials,
        password: &SecretString,
    ) -> Result<(), PhotelError> {
        let password = password.expose_secret().as_bytes();

        let salt = kdf::generate_salt().map_err(|e| save_failed("salt generation failed", e))?;
        let password_hash = hash_password(password, self.verifier)
            .map_err(|e| save_failed("password hashing failed", e))?;
        let key = kdf::derive_key(password, &salt, self.kdf_iterations)
            .map_err(|e| save_failed("key derivation failed", e))?;

        let plaintext = zeroize::Zeroizing::new(
            serde_json::to_vec(credentials)
                .map_err(|e| save_failed("failed to serialize credentials", e))?,
        );
        let sealed =
            crypto::encrypt(&key, &plaintext).map_err(|e| save_failed("encryption failed", e))?;

        let record = CredentialRecord::new(password_hash, &salt, &sealed, self.kdf_iterations);
        write_record(&self.path, &record)?;

        info!(path = %self.path.display(), "credentials saved");
        Ok(())
    }

    /// Authenticate `password` and decrypt the stored credentials.
    pub fn load(&self, password: &SecretString) -> Result<Credentials, PhotelError> {
        let record = read_record(&self.path)?;
        if record.kdf_iterations > MAX_KDF_ITERATIONS {
            return Err(PhotelError::corrupt(format!(
                "record kdf_iterations {} exceeds the maximum of {MAX_KDF_ITERATIONS}",
                record.kdf_iterations
            )));
        }
        let salt = record.salt_bytes()?;
        let sealed = record.sealed_bytes()?;

        let password = password.expose_secret().as_bytes();
        if !verify_password(password, &record.password_hash)? {
            warn!(path = %self.path.display(), "password rejected by stored verifier");
            return Err(PhotelError::InvalidPassword);
        }

        let key = kdf::derive_key(password, &salt, record.kdf_iterations).map_err(|e| {
            PhotelError::CorruptConfig {
                message: format!("record has unusable kdf_iterations {}", record.kdf_iterations),
                source: Some(Box::new(e)),
            }
        })?;
        let plaintext =
            crypto::decrypt(&key, &sealed).map_err(|e| PhotelError::CorruptConfig {
                message: "encrypted payload failed authentication".to_string(),
                source: Some(Box::new(e)),
            })?;

        let credentials: Credentials =
            serde_json::from_slice(&plaintext).map_err(|e| PhotelError::CorruptConfig {
                message: "decrypted payload is not a credential set".to_string(),
                source: Some(Box::new(e)),
            })?;

        debug!(path = %self.path.display(), "credentials loaded");
        Ok(credentials)
    }
}

fn save_failed(message: &str, source: impl std::error::Error + Send + Sync + 'static) -> PhotelError {
    PhotelError::Persistence {
        message: message.to_string(),
        source: Some(Box::new(source)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use tempfile::tempdir;

    fn fast_config() -> VaultConfig {
        VaultConfig {
            kdf_iterations: 1_000,
            verifier_memory_cost: 1024,
            verifier_iterations: 1,
            verifier_parallelism: 1,
            ..VaultConfig::default()
        }
    }

    fn store_in(dir: &Path) -> CredentialStore {
        CredentialStore::new(dir.join("config.json"), &fast_config())
    }

    fn pw(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        let creds = Credentials::new("123:ABC", "@photos", "/home/me/shots");

        store.save(&creds, &pw("correct horse")).unwrap();
        assert!(store.exists());
        assert_eq!(store.load(&pw("correct horse")).unwrap(), creds);
    }

    #[test]
    fn wrong_password_is_rejected_and_record_untouched() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store
            .save(&Credentials::new("t", "c", "/p"), &pw("right"))
            .unwrap();
        let before = std::fs::read(store.path()).unwrap();

        let err = store.load(&pw("wrong")).unwrap_err();
        assert!(matches!(err, PhotelError::InvalidPassword));
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn excessive_iteration_count_is_corrupt() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store
            .save(&Credentials::new("t", "c", "/p"), &pw("pw"))
            .unwrap();

        let mut record = read_record(store.path()).unwrap();
        record.kdf_iterations = u32::MAX;
        write_record(store.path(), &record).unwrap();

        assert!(matches!(
            store.load(&pw("pw")),
            Err(PhotelError::CorruptConfig { .. })
        ));
    }

    #[test]
    fn missing_record_is_not_found() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(!store.exists());
        assert!(matches!(
            store.load(&pw("x")),
            Err(PhotelError::NotFound { .. })
        ));
    }

    #[test]
    fn every_save_uses_a_fresh_salt() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        let creds = Credentials::new("t", "c", "/p");

        store.save(&creds, &pw("pw")).unwrap();
        let first = read_record(store.path()).unwrap();
        store.save(&creds, &pw("pw")).unwrap();
        let second = read_record(store.path()).unwrap();

        assert_ne!(first.salt, second.salt);
        assert_ne!(first.encrypted_data, second.encrypted_data);
    }

    #[test]
    fn tampered_ciphertext_is_corrupt_with_integrity_source() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store
            .save(&Credentials::new("t", "c", "/p"), &pw("pw"))
            .unwrap();

        let original = read_record(store.path()).unwrap();
        let sealed = original.sealed_bytes().unwrap();
        for i in 0..sealed.len() {
            let mut flipped = sealed.clone();
            flipped[i] ^= 0x80;
            let mut record = original.clone();
            record.encrypted_data = STANDARD.encode(&flipped);
            write_record(store.path(), &record).unwrap();

            let err = store.load(&pw("pw")).unwrap_err();
            assert!(
                matches!(err, PhotelError::CorruptConfig { .. }) && err.is_integrity_failure(),
                "byte {i}: unexpected {err:?}"
            );
        }
    }

    #[test]
    fn verifier_is_independent_of_encryption_salt() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store
            .save(&Credentials::new("t", "c", "/p"), &pw("pw"))
            .unwrap();
        let record = read_record(store.path()).unwrap();
        assert!(!record.password_hash.contains(&record.salt));
        assert!(!record.password_hash.contains(record.salt.trim_end_matches('=')));
    }

    #[test]
    fn unusable_iteration_count_is_corrupt() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store
            .save(&Credentials::new("t", "c", "/p"), &pw("pw"))
            .unwrap();
        let mut record = read_record(store.path()).unwrap();
        record.kdf_iterations = 0;
        write_record(store.path(), &record).unwrap();

        assert!(matches!(
            store.load(&pw("pw")),
            Err(PhotelError::CorruptConfig { .. })
        ));
    }

    #[test]
    fn save_into_unwritable_location_is_persistence_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"not a dir").unwrap();
        let store = CredentialStore::new(blocker.join("config.json"), &fast_config());

        let err = store
            .save(&Credentials::new("t", "c", "/p"), &pw("pw"))
            .unwrap_err();
        assert!(matches!(err, PhotelError::Persistence { .. }));
    }
}
