//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use tabula_foundation::{EntityId, Error, ErrorContext, ErrorKind, TypeHash};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_invalid_entity() {
    let err = Error::invalid_entity(EntityId::null());
    assert!(matches!(err.kind, ErrorKind::InvalidEntity(id) if id.is_null()));
}

#[test]
fn error_entity_not_found() {
    let err = Error::entity_not_found(EntityId::new(42, 1));
    assert!(matches!(err.kind, ErrorKind::EntityNotFound(_)));
    assert!(format!("{err}").contains("42"));
}

#[test]
fn error_stale_entity() {
    let err = Error::stale_entity(EntityId::new(5, 2));
    assert!(matches!(err.kind, ErrorKind::StaleEntity(_)));
    assert!(format!("{err}").contains("5v2"));
}

#[test]
fn error_component_not_found() {
    let err = Error::component_not_found(EntityId::new(3, 1), "LightComponent");
    let msg = format!("{err}");
    assert!(msg.contains("LightComponent"));
    assert!(msg.contains("3v1"));
}

#[test]
fn error_schema_derivation() {
    let err = Error::schema_derivation("constant `label` has no fixed size");
    assert!(matches!(err.kind, ErrorKind::SchemaDerivation(_)));
    assert!(format!("{err}").starts_with("schema derivation failed"));
}

// =============================================================================
// Error Display
// =============================================================================

#[test]
fn error_display_ownership_mismatch() {
    let err = Error::ownership_mismatch(TypeHash::of("Mesh"), TypeHash::of("Light"));
    let msg = format!("{err}");
    assert!(msg.contains(&TypeHash::of("Mesh").to_string()));
    assert!(msg.contains(&TypeHash::of("Light").to_string()));
}

#[test]
fn error_display_handle_in_use() {
    let err = Error::new(ErrorKind::HandleInUse(EntityId::new(9, 1)));
    assert!(format!("{err}").contains("still bound"));
}

#[test]
fn error_display_duplicate_manager() {
    let err = Error::new(ErrorKind::DuplicateManager("CameraComponent".into()));
    assert!(format!("{err}").contains("CameraComponent"));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn context_attaches_table_and_operation() {
    let err = Error::invalid_entity(EntityId::null()).with_context(
        ErrorContext::new()
            .with_table("transforms")
            .with_operation("create"),
    );
    let context = err.context.unwrap();
    assert_eq!(context.table.as_deref(), Some("transforms"));
    assert_eq!(context.operation.as_deref(), Some("create"));
    assert_eq!(context.to_string(), "in create on transforms");
}

#[test]
fn context_display_partial() {
    assert_eq!(ErrorContext::new().with_table("lights").to_string(), "on lights");
    assert_eq!(ErrorContext::new().with_operation("gc").to_string(), "in gc");
    assert_eq!(ErrorContext::new().to_string(), "");
}

#[test]
fn errors_are_std_errors() {
    fn assert_error<E: std::error::Error + Send + Sync + 'static>(_: &E) {}
    assert_error(&Error::entity_not_found(EntityId::new(0, 1)));
}
