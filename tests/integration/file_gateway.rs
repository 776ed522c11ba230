//! Integration tests for the JSON file gateway

use partlife::persistence::{JsonFileGateway, PersistenceError, PersistenceGateway};
use partlife::test_helpers::{draft, instant};
use partlife::{seed, FixedClock, InventoryStore};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_missing_file_loads_as_none() {
    let temp_dir = TempDir::new().unwrap();
    let gateway = JsonFileGateway::new(temp_dir.path().join("absent.json"));
    assert!(gateway.load().unwrap().is_none());
}

#[test]
fn test_save_then_load_in_nested_directory() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data").join("parts.json");
    let gateway = JsonFileGateway::new(&path);

    let parts = seed::default_parts(instant(2026, 5, 1));
    gateway.save(&parts).unwrap();
    assert!(path.exists());

    assert_eq!(JsonFileGateway::new(&path).load().unwrap(), Some(parts));
}

#[test]
fn test_corrupt_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("parts.json");
    fs::write(&path, "{ this is not json").unwrap();

    assert!(JsonFileGateway::new(&path).load().is_err());
}

/// Save the seed, then rewrite the file after `edit` changes its JSON.
fn saved_then_edited(temp_dir: &TempDir, edit: impl FnOnce(&mut serde_json::Value)) -> JsonFileGateway {
    let path = temp_dir.path().join("parts.json");
    let gateway = JsonFileGateway::new(&path);
    gateway.save(&seed::default_parts(instant(2026, 5, 1))).unwrap();

    let mut stored: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    edit(&mut stored);
    fs::write(&path, serde_json::to_string_pretty(&stored).unwrap()).unwrap();
    gateway
}

#[test]
fn test_edited_parts_fail_checksum() {
    let temp_dir = TempDir::new().unwrap();
    let gateway = saved_then_edited(&temp_dir, |stored| {
        stored["parts"][0]["lifespanDays"] = serde_json::json!(3650);
    });

    match gateway.load() {
        Err(PersistenceError::Corrupt(message)) => assert!(message.contains("checksum mismatch")),
        other => panic!("Expected Corrupt for edited snapshot, got {:?}", other),
    }
}

#[test]
fn test_newer_snapshot_version_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let gateway = saved_then_edited(&temp_dir, |stored| {
        stored["version"] = serde_json::json!(9);
    });

    match gateway.load() {
        Err(PersistenceError::Corrupt(message)) => assert!(message.contains("version 9")),
        other => panic!("Expected Corrupt for newer version, got {:?}", other),
    }
}

#[test]
fn test_untouched_envelope_passes_checksum() {
    let temp_dir = TempDir::new().unwrap();
    let gateway = saved_then_edited(&temp_dir, |_| {});
    assert_eq!(gateway.load().unwrap().map(|p| p.len()), Some(5));
}

#[test]
fn test_bare_array_is_accepted() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("parts.json");
    let parts = seed::default_parts(instant(2026, 5, 1));
    fs::write(&path, serde_json::to_string(&parts).unwrap()).unwrap();

    assert_eq!(JsonFileGateway::new(&path).load().unwrap(), Some(parts));
}

#[test]
fn test_store_falls_back_to_seed_on_corrupt_file_then_overwrites_it() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("parts.json");
    fs::write(&path, "garbage").unwrap();
    let clock = Arc::new(FixedClock::new(instant(2026, 5, 1)));

    let mut store = InventoryStore::bootstrap(
        Box::new(JsonFileGateway::new(&path)),
        clock.clone(),
        seed::default_parts,
    );
    assert_eq!(store.len(), 5);

    store
        .add(draft("M-04", "Drive Chain", 540, instant(2026, 2, 1)))
        .unwrap();
    assert!(!store.is_diverged());

    let reopened = InventoryStore::bootstrap(
        Box::new(JsonFileGateway::new(&path)),
        clock,
        seed::empty,
    );
    assert_eq!(reopened.len(), 6);
    assert_eq!(reopened.list(), store.list());
}
