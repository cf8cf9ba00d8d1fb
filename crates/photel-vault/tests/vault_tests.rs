// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the credential store.

use photel_config::model::VaultConfig;
use photel_core::PhotelError;
use photel_vault::{CredentialRecord, CredentialStore, Credentials};
use proptest::prelude::*;
use secrecy::SecretString;
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

fn password(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

/// Save T1/C1//x under "pw" and read it back.
#[test]
fn concrete_setup_scenario() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let store = CredentialStore::new(&path, &fast_config());
    let creds = Credentials::new("T1", "C1", "/x");

    store.save(&creds, &password("pw")).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let fields: Vec<&str> = json
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    for key in ["password_hash", "salt", "encrypted_data", "kdf_iterations"] {
        assert!(fields.contains(&key), "missing {key} in {fields:?}");
    }
    assert_eq!(json["salt"].as_str().unwrap().len(), 24);
    assert!(json["password_hash"].as_str().unwrap().starts_with("$argon2id$"));

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("T1\""), "plaintext token leaked into record");

    let loaded = store.load(&password("pw")).unwrap();
    assert_eq!(loaded.api_token, "T1");
    assert_eq!(loaded.channel_id, "C1");
    assert_eq!(loaded.save_path, "/x");
}

/// A record written by one store handle is readable by another with
/// different cost settings, because the record carries its own iterations.
#[test]
fn record_stays_readable_after_default_cost_changes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    CredentialStore::new(&path, &fast_config())
        .save(&Credentials::new("t", "c", "/p"), &password("pw"))
        .unwrap();

    let later = VaultConfig {
        kdf_iterations: 2_000,
        ..fast_config()
    };
    let loaded = CredentialStore::new(&path, &later)
        .load(&password("pw"))
        .unwrap();
    assert_eq!(loaded, Credentials::new("t", "c", "/p"));
}

#[test]
fn payload_that_is_not_credentials_is_corrupt() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let store = CredentialStore::new(&path, &fast_config());
    store
        .save(&Credentials::new("t", "c", "/p"), &password("pw"))
        .unwrap();

    // Splice a validly sealed payload of the wrong shape into the record.
    let mut record: CredentialRecord =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let salt = record.salt_bytes().unwrap();
    let key = photel_vault::kdf::derive_key(b"pw", &salt, record.kdf_iterations).unwrap();
    let sealed = photel_vault::crypto::encrypt(&key, br#"{"unexpected":true}"#).unwrap();
    record = CredentialRecord::new(record.password_hash, &salt, &sealed, record.kdf_iterations);
    std::fs::write(&path, serde_json::to_vec(&record).unwrap()).unwrap();

    let err = store.load(&password("pw")).unwrap_err();
    assert!(matches!(err, PhotelError::CorruptConfig { .. }));
    assert!(!err.is_integrity_failure());
}

#[test]
fn garbage_record_is_corrupt() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ this is not json").unwrap();

    let store = CredentialStore::new(&path, &fast_config());
    assert!(matches!(
        store.load(&password("pw")),
        Err(PhotelError::CorruptConfig { .. })
    ));
}

#[test]
fn bad_phc_string_is_corrupt() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let store = CredentialStore::new(&path, &fast_config());
    store
        .save(&Credentials::new("t", "c", "/p"), &password("pw"))
        .unwrap();

    let mut record: CredentialRecord =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    record.password_hash = "$2b$12$legacybcrypthashvalue".to_string();
    std::fs::write(&path, serde_json::to_vec(&record).unwrap()).unwrap();

    assert!(matches!(
        store.load(&password("pw")),
        Err(PhotelError::CorruptConfig { .. })
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn save_load_roundtrip(
        token in ".{0,40}",
        channel in "[@a-zA-Z0-9_-]{0,20}",
        save_path in "[/a-zA-Z0-9 ._-]{0,40}",
        pw in ".{0,24}",
    ) {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("config.json"), &fast_config());
        let creds = Credentials::new(token, channel, save_path);

        store.save(&creds, &password(&pw)).unwrap();
        prop_assert_eq!(store.load(&password(&pw)).unwrap(), creds);
    }

    #[test]
    fn other_password_never_loads(
        pw in "[a-z]{1,12}",
        other in "[A-Z]{1,12}",
    ) {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("config.json"), &fast_config());
        store.save(&Credentials::new("t", "c", "/p"), &password(&pw)).unwrap();

        let result = store.load(&password(&other));
        prop_assert!(matches!(result, Err(PhotelError::InvalidPassword)));
    }
}
