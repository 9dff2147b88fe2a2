//! Core identifiers, type tags, and errors for Tabula.
//!
//! This crate provides:
//! - [`EntityId`] - Externally owned generational entity identifiers
//! - [`ComponentId`] - Dense record indices within a component table
//! - [`TypeHash`] - Content hash identifying a record layout
//! - [`PropertyType`] - Type tags for reflected record fields
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod entity;
mod error;
mod hash;
mod types;

pub use entity::{ComponentId, EntityId};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use hash::{TypeHash, fnv1a};
pub use types::PropertyType;
