//! Dense, change-tracked component storage for Tabula.
//!
//! This crate provides:
//! - [`ComponentTable`] - Entity-indexed record storage with swap compaction
//! - [`ComponentRef`] / [`ComponentMut`] - Scoped record access; writes commit on drop
//! - [`ChangeFlags`] - Per-frame added/removed/updated polling
//! - [`PropertySchema`] - Reflected record layouts
//! - [`ComponentManager`] - Object-safe reflection over any table
//! - [`Registry`] - A driver owning many tables
//! - [`EntityStore`] - Generational entity allocation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod component;
mod config;
mod entity;
mod handle;
mod ledger;
mod reflect;
mod registry;
mod schema;
mod table;

pub use component::Component;
pub use config::TableConfig;
pub use entity::EntityStore;
pub use handle::{ComponentMut, ComponentRef};
pub use ledger::ChangeFlags;
pub use reflect::{ComponentBox, ComponentManager};
pub use registry::Registry;
pub use schema::{PropertyDescriptor, PropertyFlags, PropertySchema};
pub use table::ComponentTable;
