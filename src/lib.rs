//! Tabula - Generic component storage
//!
//! This crate re-exports all layers of the Tabula system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: tabula_dynamic    — Resource-derived schemas, shared bundles, remapping
//! Layer 1: tabula_storage    — Component tables, change tracking, reflection
//! Layer 0: tabula_foundation — Core types (EntityId, TypeHash, PropertyType, Error)
//! ```

pub use tabula_dynamic as dynamic;
pub use tabula_foundation as foundation;
pub use tabula_storage as storage;
