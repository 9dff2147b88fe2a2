//! Integration tests for type tags and hashes
//!
//! Tests property type layouts and type-name hashing.

use tabula_foundation::{PropertyType, TypeHash, fnv1a};

// =============================================================================
// PropertyType
// =============================================================================

#[test]
fn scalar_sizes() {
    for ty in [
        PropertyType::Bool,
        PropertyType::Int,
        PropertyType::UInt,
        PropertyType::Float,
        PropertyType::Enum,
        PropertyType::Bitfield,
    ] {
        assert_eq!(ty.byte_size(), Some(4), "{ty}");
    }
}

#[test]
fn vector_and_matrix_sizes() {
    assert_eq!(PropertyType::Vector(3).byte_size(), Some(12));
    assert_eq!(PropertyType::Matrix(4, 4).byte_size(), Some(64));
    assert_eq!(PropertyType::Matrix(3, 4).byte_size(), Some(48));
}

#[test]
fn references_have_no_fixed_size() {
    for ty in [
        PropertyType::String,
        PropertyType::Entity,
        PropertyType::Resource,
        PropertyType::Struct,
    ] {
        assert_eq!(ty.byte_size(), None, "{ty}");
        assert!(!ty.is_scalar());
    }
}

#[test]
fn type_display() {
    assert_eq!(PropertyType::Vector(4).to_string(), "float4");
    assert_eq!(PropertyType::Matrix(3, 4).to_string(), "float3x4");
    assert_eq!(PropertyType::Resource.to_string(), "resource");
}

// =============================================================================
// TypeHash
// =============================================================================

const TRANSFORM: TypeHash = TypeHash::of("TransformComponent");

#[test]
fn type_hash_is_fnv1a_of_name() {
    assert_eq!(TRANSFORM.raw(), fnv1a("TransformComponent"));
    assert_eq!(TypeHash::from_raw(TRANSFORM.raw()), TRANSFORM);
}

#[test]
fn distinct_names_hash_apart() {
    assert_ne!(TypeHash::of("TransformComponent"), TypeHash::of("CameraComponent"));
    assert_ne!(TypeHash::of("Light"), TypeHash::of("light"));
}

#[test]
fn type_hash_display_is_hex() {
    let text = TRANSFORM.to_string();
    assert_eq!(text.len(), 16);
    assert!(text.chars().all(|c| c.is_ascii_hexdigit()));
}
