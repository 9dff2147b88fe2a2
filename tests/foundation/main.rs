//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: EntityId, ComponentId, TypeHash, PropertyType, and Error.

mod errors;
mod identifiers;
mod types;
