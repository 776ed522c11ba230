//! Integration tests for inventory mutations
//!
//! Drives the store and the shared handle the way an operator session does:
//! install, wait, replace, clone, and check what reached storage.

use chrono::Duration;
use fake::faker::lorem::en::Word;
use fake::Fake;
use partlife::persistence::{MemoryGateway, PersistenceGateway};
use partlife::test_helpers::{draft, instant, FlakyGateway};
use partlife::{
    seed, FixedClock, InventoryError, InventoryStore, PartDraft, PartStatus, SharedInventory,
};
use std::collections::HashSet;
use std::sync::Arc;

#[test]
fn test_hose_installed_then_replaced_next_day() {
    let clock = Arc::new(FixedClock::new(instant(2026, 3, 1)));
    let gateway = MemoryGateway::new();
    let mut store = InventoryStore::bootstrap(Box::new(gateway.clone()), clock.clone(), seed::empty);

    let hose = store
        .add(draft("M-09", "Hose", 180, instant(2026, 3, 1)))
        .unwrap();
    assert_eq!(store.health()[&hose.id].days_elapsed, 0);

    clock.advance(Duration::days(1));
    assert_eq!(store.health()[&hose.id].days_elapsed, 1);

    let replaced = store.replace(&hose.id).unwrap();
    assert_eq!(replaced.install_date, instant(2026, 3, 2));
    assert_eq!(replaced.name, "Hose");
    assert_eq!(store.health()[&hose.id].days_elapsed, 0);

    let stored = gateway.snapshot().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].install_date, instant(2026, 3, 2));
}

#[test]
fn test_overdue_seed_part_reads_critical_until_replaced() {
    let clock = Arc::new(FixedClock::new(instant(2026, 5, 1)));
    let mut store = InventoryStore::bootstrap(
        Box::new(MemoryGateway::new()),
        clock,
        seed::default_parts,
    );
    let cabin = store.list()[4].id.clone();
    assert_eq!(store.health()[&cabin].status, PartStatus::Critical);

    store.replace(&cabin).unwrap();
    assert_eq!(store.health()[&cabin].status, PartStatus::Good);
}

#[test]
fn test_clone_deploys_to_another_machine() {
    let clock = Arc::new(FixedClock::new(instant(2026, 5, 1)));
    let mut store = InventoryStore::bootstrap(
        Box::new(MemoryGateway::new()),
        clock,
        seed::default_parts,
    );
    let source = store.list()[0].clone();

    let mut prefilled = store.clone_draft(&source.id).unwrap();
    assert!(prefilled.machine_id.is_empty());
    prefilled.machine_id = "M-07".to_string();

    let copy = store.clone_part(&source.id, prefilled).unwrap();
    assert_ne!(copy.id, source.id);
    assert_eq!(copy.name, source.name);
    assert_eq!(copy.machine_id, "M-07");
    assert_eq!(store.get(&source.id), Some(&source));
    assert_eq!(store.len(), 6);
}

#[test]
fn test_invalid_draft_leaves_inventory_and_storage_untouched() {
    let clock = Arc::new(FixedClock::new(instant(2026, 5, 1)));
    let gateway = FlakyGateway::new();
    let mut store = InventoryStore::bootstrap(Box::new(gateway.clone()), clock, seed::empty);

    let result = store.add(PartDraft {
        lifespan_days: 0,
        ..draft("M-01", "Belt", 0, instant(2026, 5, 1))
    });
    assert!(matches!(result, Err(InventoryError::Validation(_))));
    assert!(store.is_empty());
    assert_eq!(gateway.save_count(), 0);
}

#[test]
fn test_failed_save_keeps_change_and_flush_recovers() {
    let clock = Arc::new(FixedClock::new(instant(2026, 5, 1)));
    let gateway = FlakyGateway::new();
    let mut store = InventoryStore::bootstrap(Box::new(gateway.clone()), clock, seed::empty);

    gateway.set_failing(true);
    let belt = store
        .add(draft("M-01", "Belt", 365, instant(2026, 4, 1)))
        .unwrap();
    assert!(store.is_diverged());
    assert!(store.get(&belt.id).is_some());

    gateway.set_failing(false);
    assert!(store.flush().is_ok());
    assert!(!store.is_diverged());
    assert_eq!(gateway.saved(), store.list().to_vec());
}

#[test]
fn test_generated_drafts_get_unique_ids() {
    let clock = Arc::new(FixedClock::new(instant(2026, 5, 1)));
    let mut store = InventoryStore::bootstrap(
        Box::new(MemoryGateway::new()),
        clock,
        seed::default_parts,
    );

    for _ in 0..50 {
        let name: String = Word().fake();
        let machine = format!("M-{:02}", (1..20).fake::<u32>());
        let lifespan = (1..3650).fake::<i64>();
        let age = (0..4000).fake::<i64>();
        store
            .add(draft(&machine, &name, lifespan, instant(2026, 5, 1) - Duration::days(age)))
            .unwrap();
    }

    let ids: HashSet<_> = store.list().iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids.len(), 55);
    assert_eq!(store.health().len(), 55);
}

#[test]
fn test_shared_handles_persist_every_add() {
    let clock = Arc::new(FixedClock::new(instant(2026, 5, 1)));
    let gateway = MemoryGateway::new();
    let store = InventoryStore::bootstrap(Box::new(gateway.clone()), clock, seed::empty);
    let shared = SharedInventory::spawn(store).unwrap();

    let workers: Vec<_> = (0..4)
        .map(|machine| {
            let handle = shared.handle();
            std::thread::spawn(move || {
                for i in 0..5 {
                    handle
                        .add(draft(&format!("M-{}", machine), &format!("Part {}", i), 100, instant(2026, 4, 1)))
                        .unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let listed = shared.handle().list().unwrap();
    assert_eq!(listed.len(), 20);
    let store = shared.shutdown().unwrap();
    assert_eq!(store.len(), 20);
    assert_eq!(gateway.load().unwrap().map(|p| p.len()), Some(20));
}
