//! Resource-derived property schemas for Tabula.
//!
//! Some records gain fields from an external resource such as a shader. This
//! crate provides:
//! - [`SchemaSource`] - A resource that can describe the fields it adds
//! - [`SchemaBundle`] - A derived schema shared by records on one resource version
//! - [`SchemaCache`] - Weakly held bundles, derived at most once per version
//! - [`DynamicProperties`] - Per-record slot values and constant blob, remapped on rebind
//! - [`DynamicTable`] - A component table that binds its records to resources

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bundle;
mod cache;
mod config;
mod properties;
mod resource;
mod table;

pub use bundle::SchemaBundle;
pub use cache::SchemaCache;
pub use config::SchemaCacheConfig;
pub use properties::{DynamicProperties, SlotValue};
pub use resource::{FieldKind, ResourceField, ResourceId, ResourceKey, SchemaSource, ShaderManifest};
pub use table::{DynamicComponent, DynamicTable};
