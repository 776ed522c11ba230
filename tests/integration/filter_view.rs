//! Integration tests for filtered views over a store

use partlife::filter::EmptyReason;
use partlife::persistence::MemoryGateway;
use partlife::test_helpers::{draft, instant};
use partlife::{seed, Facet, FilterSelection, FixedClock, InventoryStore, PartDraft};
use std::sync::Arc;

fn seeded_store() -> InventoryStore {
    let clock = Arc::new(FixedClock::new(instant(2026, 5, 1)));
    InventoryStore::bootstrap(Box::new(MemoryGateway::new()), clock, seed::default_parts)
}

#[test]
fn test_all_all_returns_whole_inventory_in_order() {
    let store = seeded_store();
    let view = store.view();
    let shown = view.apply(&FilterSelection::new(Facet::parse("all"), Facet::parse("all")));
    let expected: Vec<_> = store.list().iter().collect();
    assert_eq!(shown, expected);
}

#[test]
fn test_facets_combine_as_conjunction() {
    let mut store = seeded_store();
    store
        .add(draft("M-02", "Engine Air Filter", 365, instant(2026, 1, 1)))
        .unwrap();

    let view = store.view();
    let selection = FilterSelection::new(Facet::parse("M-02"), Facet::parse("Engine Air Filter"));
    let shown = view.apply(&selection);
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].machine_id, "M-02");

    let by_name = view.apply(&FilterSelection::new(Facet::All, Facet::parse("Engine Air Filter")));
    assert_eq!(by_name.len(), 2);
}

#[test]
fn test_facet_lists_are_sorted_and_distinct() {
    let mut store = seeded_store();
    store
        .add(draft("M-00", "Brake Pads (Front)", 730, instant(2026, 1, 1)))
        .unwrap();

    let view = store.view();
    assert_eq!(view.machines(), vec!["M-00", "M-01", "M-02", "M-03"]);
    assert_eq!(
        view.part_names(),
        vec![
            "Brake Pads (Front)",
            "Cabin Filter",
            "Engine Air Filter",
            "Synthetic Oil",
            "Timing Belt",
        ]
    );
}

#[test]
fn test_new_part_stays_visible_under_machine_filter() {
    let mut store = seeded_store();
    let mut selection = FilterSelection::new(Facet::parse("M-01"), Facet::All);

    let prefilled = PartDraft::new_for(&selection, store.now());
    assert_eq!(prefilled.machine_id, "M-01");

    let part = store
        .add(draft("M-05", "Coolant", 730, instant(2026, 4, 1)))
        .unwrap();
    selection.follow_new_part(&part);
    assert_eq!(selection.machine, Facet::Only("M-05".to_string()));
    assert_eq!(store.view().apply(&selection).len(), 1);
}

#[test]
fn test_empty_results_explain_themselves() {
    let store = seeded_store();
    let view = store.view();
    let none = view.apply(&FilterSelection::new(Facet::parse("M-99"), Facet::All));
    assert_eq!(view.empty_reason(&none), Some(EmptyReason::NoMatches));

    let clock = Arc::new(FixedClock::new(instant(2026, 5, 1)));
    let empty = InventoryStore::bootstrap(Box::new(MemoryGateway::new()), clock, seed::empty);
    let view = empty.view();
    let shown = view.apply(&FilterSelection::default());
    assert_eq!(view.empty_reason(&shown), Some(EmptyReason::NoParts));
}
