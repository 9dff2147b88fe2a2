//! Integration tests for reflection
//!
//! Tests schemas and type-erased access through `ComponentManager`.

use tabula_foundation::{EntityId, ErrorKind, PropertyType, TypeHash};
use tabula_storage::{
    Component, ComponentBox, ComponentManager, ComponentTable, PropertyFlags, PropertySchema,
};

use crate::{Light, Transform, at, init_logging};

fn e(index: u64) -> EntityId {
    EntityId::new(index, 1)
}

// =============================================================================
// Schemas
// =============================================================================

#[test]
fn schema_lists_fields_in_order() {
    let schema = Light::schema();
    let names: Vec<_> = schema.iter().map(|p| p.name.as_ref()).collect();

    assert_eq!(schema.type_name(), "LightComponent");
    assert_eq!(schema.type_hash(), Light::TYPE_HASH);
    assert_eq!(names, ["color", "range", "layers"]);
    assert!(schema.find("layers").unwrap().flags.contains(PropertyFlags::BITFIELD));
    assert!(schema.find("intensity").is_none());
}

#[test]
fn offsets_follow_the_struct() {
    let schema = Transform::schema();
    let scale = schema.find("scale").unwrap();
    assert_eq!(scale.offset, std::mem::offset_of!(Transform, scale));
    assert_eq!(scale.byte_size(), Some(4));
}

#[test]
fn nested_schemas_describe_elements() {
    let element = std::sync::Arc::new(Transform::schema());
    let schema = PropertySchema::new("SkeletonComponent").with_property(
        tabula_storage::PropertyDescriptor::new("bones", 0, PropertyType::Struct)
            .array(16)
            .with_container(element.clone()),
    );

    let bones = schema.get(0).unwrap();
    assert!(bones.is_array());
    assert_eq!(bones.count, 16);
    assert_eq!(bones.container.as_deref(), Some(element.as_ref()));
    assert_eq!(bones.byte_size(), None);
}

// =============================================================================
// Type-Erased Access
// =============================================================================

#[test]
fn tables_behind_trait_objects() {
    let mut tables: Vec<Box<dyn ComponentManager>> = vec![
        Box::new(ComponentTable::<Transform>::new()),
        Box::new(ComponentTable::<Light>::new()),
    ];

    for table in &mut tables {
        table.create(e(0)).unwrap();
    }

    let counts: Vec<_> = tables.iter().map(|t| t.property_count()).collect();
    assert_eq!(counts, [2, 3]);
    assert!(tables.iter().all(|t| t.has_component(e(0))));
    assert_eq!(tables[1].type_hash(), TypeHash::of("LightComponent"));
}

#[test]
fn copy_between_tables_of_the_same_layout() {
    init_logging();
    let mut source = ComponentTable::<Transform>::new();
    let mut target = ComponentTable::<Transform>::new();
    source.set(e(1), at(1.0, 2.0, 3.0)).unwrap();

    let from: &dyn ComponentManager = &source;
    let to: &mut dyn ComponentManager = &mut target;
    let boxed = from.component(e(1)).unwrap();

    assert!(to.is_matching(&boxed));
    assert!(to.set_data(e(7), &boxed));
    assert_eq!(target.get(e(7)), Some(at(1.0, 2.0, 3.0)));
    assert_eq!(target.added_components(), vec![e(7)]);
}

#[test]
fn copy_between_unrelated_layouts_is_refused() {
    init_logging();
    let mut lights = ComponentTable::<Light>::new();
    lights.create(e(0)).unwrap();
    lights.added_components();
    lights.updated_components();
    let before = lights.get(e(0));

    let foreign = ComponentBox::new(at(9.0, 9.0, 9.0));
    assert!(!lights.set_data(e(0), &foreign));
    assert!(!lights.set_data(e(1), &foreign));

    assert_eq!(lights.get(e(0)), before);
    assert!(!lights.has_component(e(1)));
    assert!(lights.updated_components().is_empty());
}

#[test]
fn generic_create_clone_release() {
    let table: Box<dyn ComponentManager> = Box::new(ComponentTable::<Light>::new());

    let mut record = table.create_component();
    record.downcast_mut::<Light>().unwrap().range = 12.0;
    let copy = table.clone_component(&record).unwrap();

    assert_eq!(copy.owner(), Light::TYPE_HASH);
    assert_eq!(copy.downcast_ref::<Light>().unwrap().range, 12.0);
    assert!(copy.downcast_ref::<Transform>().is_none());
    table.release(record).unwrap();
    table.release(copy).unwrap();
}

#[test]
fn release_checks_owner_and_binding() {
    let mut table = ComponentTable::<Light>::new();
    table.create(e(0)).unwrap();

    let foreign = ComponentBox::new(Transform::default());
    let err = table.release(foreign).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::OwnershipMismatch { expected, actual }
            if expected == Light::TYPE_HASH && actual == Transform::TYPE_HASH
    ));

    let bound = ComponentManager::component(&table, e(0)).unwrap();
    let err = table.release(bound).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::HandleInUse(_)));
}

#[test]
fn downcast_to_concrete_table() {
    let mut erased: Box<dyn ComponentManager> = Box::new(ComponentTable::<Transform>::new());
    erased.create(e(0)).unwrap();

    let table = erased
        .as_any_mut()
        .downcast_mut::<ComponentTable<Transform>>()
        .unwrap();
    table.write(e(0)).unwrap().scale = 4.0;

    assert!(erased.as_any().downcast_ref::<ComponentTable<Light>>().is_none());
    assert_eq!(erased.updated_components(), vec![e(0)]);
}
