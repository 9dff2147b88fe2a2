//! Integration tests for component tables
//!
//! Tests creation, destruction, round-trips, and compaction.

use proptest::prelude::*;
use tabula_foundation::{ComponentId, EntityId, ErrorKind};
use tabula_storage::{ComponentTable, EntityStore, TableConfig};

use crate::{Transform, at, init_logging};

fn spawn(count: usize) -> (EntityStore, Vec<EntityId>) {
    let mut store = EntityStore::new();
    let entities = (0..count).map(|_| store.spawn()).collect();
    (store, entities)
}

// =============================================================================
// Create / Destroy
// =============================================================================

#[test]
fn create_then_destroy() {
    init_logging();
    let (_, entities) = spawn(3);
    let mut table = ComponentTable::<Transform>::new();

    for e in &entities {
        table.create(*e).unwrap();
        assert!(table.has_component(*e));
    }
    assert!(table.destroy(entities[1]));
    assert!(!table.has_component(entities[1]));
    assert!(!table.destroy(entities[1]));
    assert_eq!(table.len(), 2);
}

#[test]
fn destroy_unknown_entity_returns_false() {
    let mut table = ComponentTable::<Transform>::new();
    assert!(!table.destroy(EntityId::new(3, 1)));
    assert!(!table.destroy(EntityId::null()));
    assert!(table.modified_flags().is_empty());
}

#[test]
fn create_rejects_null() {
    let mut table = ComponentTable::<Transform>::new();
    let err = table.create(EntityId::null()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidEntity(_)));
    assert!(table.set(EntityId::null(), at(1.0, 0.0, 0.0)).is_err());
    assert_eq!(table.generation_counter(), 0);
}

#[test]
fn recreating_a_live_entity_discards_its_data() {
    let (_, entities) = spawn(1);
    let e = entities[0];
    let mut table = ComponentTable::<Transform>::new();
    table.set(e, at(5.0, 5.0, 5.0)).unwrap();
    table.added_components();

    let id = table.create(e).unwrap();
    assert_eq!(table.component_id(e), Some(id));
    assert_eq!(table.get(e), Some(Transform::default()));
    assert!(table.added_components().is_empty());
    assert_eq!(table.len(), 1);
}

#[test]
fn stale_entity_is_a_different_key() {
    let (mut store, entities) = spawn(1);
    let old = entities[0];
    let mut table = ComponentTable::<Transform>::new();
    table.create(old).unwrap();

    store.despawn(old).unwrap();
    table.destroy(old);
    let new = store.spawn();
    assert_eq!(new.index, old.index);

    table.create(new).unwrap();
    assert!(table.has_component(new));
    assert!(!table.has_component(old));
}

// =============================================================================
// Values
// =============================================================================

#[test]
fn set_get_round_trip() {
    let (_, entities) = spawn(2);
    let mut table = ComponentTable::<Transform>::new();

    table.set(entities[0], at(1.0, 2.0, 3.0)).unwrap();
    table.set(entities[1], at(4.0, 5.0, 6.0)).unwrap();
    table.set(entities[0], at(7.0, 8.0, 9.0)).unwrap();

    assert_eq!(table.get(entities[0]), Some(at(7.0, 8.0, 9.0)));
    assert_eq!(table.get(entities[1]), Some(at(4.0, 5.0, 6.0)));
    assert_eq!(table.get(EntityId::new(99, 1)), None);
}

#[test]
fn ids_and_entities_agree() {
    let (_, entities) = spawn(4);
    let mut table = ComponentTable::<Transform>::new();
    for e in &entities {
        table.create(*e).unwrap();
    }

    for e in &entities {
        let id = table.component_id(*e).unwrap();
        assert_eq!(table.entity(id), Some(*e));
    }
    assert_eq!(table.entity(ComponentId::new(4)), None);
}

// =============================================================================
// Compaction
// =============================================================================

#[test]
fn gc_reclaims_freed_slots() {
    init_logging();
    let (_, entities) = spawn(6);
    let mut table = ComponentTable::<Transform>::new();
    for (i, e) in entities.iter().enumerate() {
        table.set(*e, at(i as f32, 0.0, 0.0)).unwrap();
    }
    for e in entities.iter().step_by(2) {
        table.destroy(*e);
    }

    assert_eq!(table.capacity(), 6);
    assert_eq!(table.gc(), 3);
    assert_eq!(table.capacity(), 3);

    for (i, e) in entities.iter().enumerate().skip(1).step_by(2) {
        let id = table.component_id(*e).unwrap();
        assert_eq!(table.entity(id), Some(*e));
        assert_eq!(table.get(*e), Some(at(i as f32, 0.0, 0.0)));
    }
}

#[test]
fn gc_waits_for_threshold() {
    let (_, entities) = spawn(8);
    let mut table =
        ComponentTable::<Transform>::with_config(TableConfig::high_churn("particles"));
    for e in &entities {
        table.create(*e).unwrap();
    }
    for e in &entities[..4] {
        table.destroy(*e);
    }

    assert_eq!(table.gc(), 0);
    assert_eq!(table.free_slots(), 4);
    assert_eq!(table.len(), 4);
}

#[test]
fn gc_survives_flag_clearing() {
    let (_, entities) = spawn(2);
    let mut table = ComponentTable::<Transform>::new();
    table.create(entities[0]).unwrap();
    table.create(entities[1]).unwrap();
    table.destroy(entities[0]);
    table.clear_modified_flags();

    assert_eq!(table.gc(), 1);
    assert_eq!(table.component_id(entities[1]), Some(ComponentId::new(0)));
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #[test]
    fn lookup_is_consistent_after_gc(
        creates in prop::collection::vec(0u64..32, 0..64),
        destroys in prop::collection::vec(0u64..32, 0..64),
    ) {
        let mut table = ComponentTable::<Transform>::new();
        for i in &creates {
            table.set(EntityId::new(*i, 1), at(*i as f32, 0.0, 0.0)).unwrap();
        }
        for i in &destroys {
            table.destroy(EntityId::new(*i, 1));
        }
        table.gc();

        prop_assert_eq!(table.capacity(), table.len());
        for e in table.entities().collect::<Vec<_>>() {
            let id = table.component_id(e).unwrap();
            prop_assert_eq!(table.entity(id), Some(e));
            prop_assert_eq!(table.get(e), Some(at(e.index as f32, 0.0, 0.0)));
        }
        for i in &destroys {
            prop_assert!(!table.has_component(EntityId::new(*i, 1)));
        }
    }

    #[test]
    fn set_then_get_returns_value(x in any::<f32>(), y in any::<f32>(), scale in any::<f32>()) {
        prop_assume!(!x.is_nan() && !y.is_nan() && !scale.is_nan());
        let mut table = ComponentTable::<Transform>::new();
        let e = EntityId::new(0, 1);
        let value = Transform { translation: [x, y, 0.0], scale };

        table.set(e, value.clone()).unwrap();
        prop_assert_eq!(table.get(e), Some(value));
    }
}
