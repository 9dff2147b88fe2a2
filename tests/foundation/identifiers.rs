//! Integration tests for identifiers
//!
//! Tests entity ids, the null sentinel, and dense component ids.

use std::collections::HashSet;

use tabula_foundation::{ComponentId, EntityId};

// =============================================================================
// EntityId
// =============================================================================

#[test]
fn null_is_the_only_invalid_entity() {
    assert!(EntityId::null().is_null());
    assert!(!EntityId::null().is_valid());
    assert!(EntityId::new(0, 0).is_valid());
    assert!(EntityId::new(u64::MAX - 1, 7).is_valid());
}

#[test]
fn default_entity_is_null() {
    assert_eq!(EntityId::default(), EntityId::null());
}

#[test]
fn generation_distinguishes_entities() {
    let old = EntityId::new(4, 1);
    let new = EntityId::new(4, 3);
    assert_ne!(old, new);

    let set: HashSet<_> = [old, new, EntityId::new(4, 1)].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn entity_formatting() {
    assert_eq!(format!("{:?}", EntityId::new(42, 3)), "EntityId(42v3)");
    assert_eq!(format!("{:?}", EntityId::null()), "EntityId(null)");
    assert_eq!(EntityId::new(42, 3).to_string(), "Entity(42)");
}

// =============================================================================
// ComponentId
// =============================================================================

#[test]
fn component_id_round_trips_index() {
    for index in [0, 1, 1_000, 65_536] {
        assert_eq!(ComponentId::new(index).index(), index);
    }
}

#[test]
fn component_id_orders_by_index() {
    assert!(ComponentId::new(1) < ComponentId::new(2));
    assert_eq!(ComponentId::new(7).to_string(), "#7");
    assert_eq!(format!("{:?}", ComponentId::new(7)), "ComponentId(7)");
}
