// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 key derivation from a password.
//!
//! The derived key encrypts the credential payload. It is unrelated to the
//! password verifier in [`crate::verifier`], which has its own salt.

use std::num::NonZeroU32;

use photel_core::PhotelError;
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

/// Length of the encryption salt stored in the record.
pub const SALT_LEN: usize = 16;

/// Length of the derived AES-256 key.
pub const KEY_LEN: usize = 32;

/// Derive a 32-byte key from `password` and `salt` with `iterations` rounds.
///
/// The returned key is wrapped in [`Zeroizing`] for automatic memory zeroing
/// on drop.
pub fn derive_key(
    password: &[u8],
    salt: &[u8; SALT_LEN],
    iterations: u32,
) -> Result<Zeroizing<[u8; KEY_LEN]>, PhotelError> {
    let iterations = NonZeroU32::new(iterations)
        .ok_or_else(|| PhotelError::Config("kdf iterations must be non-zero".to_string()))?;

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        password,
        key.as_mut(),
    );
    Ok(key)
}

/// Generate a random 16-byte salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN], PhotelError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| PhotelError::Internal("failed to generate random salt".to_string()))?;
    Ok(salt)
}
