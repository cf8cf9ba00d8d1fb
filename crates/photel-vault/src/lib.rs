// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password-protected credential store for Photel.
//!
//! The credential set is sealed with AES-256-GCM under a key derived from the
//! password with PBKDF2-HMAC-SHA256. An independent Argon2id verifier
//! authenticates the password before decryption is attempted.

pub mod credentials;
pub mod crypto;
pub mod kdf;
pub mod prompt;
pub mod record;
pub mod store;
pub mod verifier;

pub use credentials::{mask_secret, Credentials};
pub use prompt::{read_new_password, read_password};
pub use record::CredentialRecord;
pub use store::CredentialStore;
pub use verifier::VerifierParams;
