// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id password verifier stored alongside the encrypted payload.
//!
//! The verifier carries its own salt inside the PHC string. It authenticates
//! the password before any decryption is attempted and plays no part in
//! deriving the encryption key.

use argon2::password_hash::{
    Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use photel_config::model::VaultConfig;
use photel_core::PhotelError;
use ring::rand::{SecureRandom, SystemRandom};

/// Argon2id cost parameters for new verifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifierParams {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl VerifierParams {
    pub fn from_config(config: &VaultConfig) -> Self {
        Self {
            memory_cost: config.verifier_memory_cost,
            iterations: config.verifier_iterations,
            parallelism: config.verifier_parallelism,
        }
    }
}

impl Default for VerifierParams {
    fn default() -> Self {
        Self::from_config(&VaultConfig::default())
    }
}

/// Hash `password` into a PHC-format Argon2id string with a fresh random salt.
pub fn hash_password(password: &[u8], params: VerifierParams) -> Result<String, PhotelError> {
    let argon_params = Params::new(
        params.memory_cost,
        params.iterations,
        params.parallelism,
        None,
    )
    .map_err(|e| PhotelError::Config(format!("invalid Argon2id parameters: {e}")))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

    let mut salt_bytes = [0u8; 16];
    SystemRandom::new()
        .fill(&mut salt_bytes)
        .map_err(|_| PhotelError::Internal("failed to generate verifier salt".to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| PhotelError::Internal(format!("failed to encode verifier salt: {e}")))?;

    let hash = argon2
        .hash_password(password, &salt)
        .map_err(|e| PhotelError::Internal(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Check `password` against a stored PHC string.
///
/// Returns `Ok(false)` on a mismatch. A string that does not parse as a PHC
/// hash is a corrupt record.
pub fn verify_password(password: &[u8], phc: &str) -> Result<bool, PhotelError> {
    let parsed = PasswordHash::new(phc)
        .map_err(|e| PhotelError::corrupt(format!("password hash is not a valid PHC string: {e}")))?;

    match Argon2::default().verify_password(password, &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(PhotelError::corrupt(format!(
            "password hash could not be checked: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low cost for fast tests.
    const FAST: VerifierParams = VerifierParams {
        memory_cost: 1024,
        iterations: 1,
        parallelism: 1,
    };

    #[test]
    fn correct_password_verifies() {
        let phc = hash_password(b"hunter2", FAST).unwrap();
        assert!(verify_password(b"hunter2", &phc).unwrap());
    }

    #[test]
    fn wrong_password_is_false_not_error() {
        let phc = hash_password(b"hunter2", FAST).unwrap();
        assert!(!verify_password(b"hunter3", &phc).unwrap());
    }

    #[test]
    fn hash_is_argon2id_phc_with_params() {
        let phc = hash_password(b"pw", FAST).unwrap();
        assert!(phc.starts_with("$argon2id$v=19$m=1024,t=1,p=1$"), "{phc}");
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password(b"pw", FAST).unwrap();
        let b = hash_password(b"pw", FAST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_hash_is_corrupt() {
        let err = verify_password(b"pw", "not a phc string").unwrap_err();
        assert!(matches!(err, PhotelError::CorruptConfig { .. }));
    }

    #[test]
    fn invalid_params_are_config_errors() {
        let params = VerifierParams {
            memory_cost: 1,
            iterations: 1,
            parallelism: 1,
        };
        let err = hash_password(b"pw", params).unwrap_err();
        assert!(matches!(err, PhotelError::Config(_)));
    }

    #[test]
    fn defaults_follow_vault_config() {
        let params = VerifierParams::default();
        assert_eq!(params.memory_cost, 19_456);
        assert_eq!(params.iterations, 2);
        assert_eq!(params.parallelism, 1);
    }
}
