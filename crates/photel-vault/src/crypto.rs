// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM sealing of the credential payload.
//!
//! Sealed output is self-describing:
//!
//! ```text
//! version (1) || nonce (12) || ciphertext || tag (16)
//! ```
//!
//! Every call to [`encrypt`] draws a fresh 96-bit nonce from the system CSPRNG.

use photel_core::PhotelError;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

use crate::kdf::KEY_LEN;

/// Format version written as the first byte of sealed output.
pub const FORMAT_VERSION: u8 = 1;

const TAG_LEN: usize = 16;
const HEADER_LEN: usize = 1 + NONCE_LEN;

fn aead_key(key: &[u8; KEY_LEN]) -> Result<LessSafeKey, PhotelError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| PhotelError::Internal("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt `plaintext` under `key`, returning versioned, self-describing output.
pub fn encrypt(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Vec<u8>, PhotelError> {
    let key = aead_key(key)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    SystemRandom::new()
        .fill(&mut nonce_bytes)
        .map_err(|_| PhotelError::Internal("failed to generate random nonce".to_string()))?;

    let mut in_out = plaintext.to_vec();
    key.seal_in_place_append_tag(
        Nonce::assume_unique_for_key(nonce_bytes),
        Aad::empty(),
        &mut in_out,
    )
    .map_err(|_| PhotelError::Internal("AES-256-GCM encryption failed".to_string()))?;

    let mut sealed = Vec::with_capacity(HEADER_LEN + in_out.len());
    sealed.push(FORMAT_VERSION);
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&in_out);
    Ok(sealed)
}

/// Decrypt output produced by [`encrypt`].
///
/// Fails with [`PhotelError::Integrity`] when the key is wrong, any byte was
/// altered, the input is truncated, or the version byte is unknown.
pub fn decrypt(key: &[u8; KEY_LEN], sealed: &[u8]) -> Result<Zeroizing<Vec<u8>>, PhotelError> {
    if sealed.len() < HEADER_LEN + TAG_LEN || sealed[0] != FORMAT_VERSION {
        return Err(PhotelError::Integrity);
    }

    let mut nonce_bytes = [0u8; NONCE_LEN];
    nonce_bytes.copy_from_slice(&sealed[1..HEADER_LEN]);

    let key = aead_key(key)?;
    let mut in_out = Zeroizing::new(sealed[HEADER_LEN..].to_vec());
    let plaintext = key
        .open_in_place(
            Nonce::assume_unique_for_key(nonce_bytes),
            Aad::empty(),
            in_out.as_mut_slice(),
        )
        .map_err(|_| PhotelError::Integrity)?;

    Ok(Zeroizing::new(plaintext.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> [u8; KEY_LEN] {
        [byte; KEY_LEN]
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let sealed = encrypt(&key(7), b"secret bot token").unwrap();
        let opened = decrypt(&key(7), &sealed).unwrap();
        assert_eq!(opened.as_slice(), b"secret bot token");
    }

    #[test]
    fn output_carries_version_nonce_and_tag() {
        let sealed = encrypt(&key(1), b"hello").unwrap();
        assert_eq!(sealed[0], FORMAT_VERSION);
        assert_eq!(sealed.len(), 1 + NONCE_LEN + 5 + TAG_LEN);
    }

    #[test]
    fn same_plaintext_encrypts_differently() {
        let a = encrypt(&key(2), b"same input").unwrap();
        let b = encrypt(&key(2), b"same input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_is_an_integrity_error() {
        let sealed = encrypt(&key(3), b"data").unwrap();
        let err = decrypt(&key(4), &sealed).unwrap_err();
        assert!(matches!(err, PhotelError::Integrity));
    }

    #[test]
    fn every_flipped_byte_is_detected() {
        let sealed = encrypt(&key(5), b"do not tamper").unwrap();
        for i in 0..sealed.len() {
            let mut tampered = sealed.clone();
            tampered[i] ^= 0x01;
            assert!(
                matches!(decrypt(&key(5), &tampered), Err(PhotelError::Integrity)),
                "flip at byte {i} went undetected"
            );
        }
    }

    #[test]
    fn truncated_input_is_rejected() {
        let sealed = encrypt(&key(6), b"payload").unwrap();
        assert!(matches!(
            decrypt(&key(6), &sealed[..HEADER_LEN + TAG_LEN - 1]),
            Err(PhotelError::Integrity)
        ));
        assert!(matches!(decrypt(&key(6), &[]), Err(PhotelError::Integrity)));
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let sealed = encrypt(&key(8), b"").unwrap();
        assert!(decrypt(&key(8), &sealed).unwrap().is_empty());
    }
}
