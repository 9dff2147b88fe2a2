//! External resources that contribute fields to a record's schema.
//!
//! A resource (typically a shader) is identified by a stable [`ResourceId`]
//! and a version that changes whenever its field list may have changed. The
//! pair forms the [`ResourceKey`] that derived schemas are cached under, so a
//! recycled id with a new version never aliases an older derivation.

use std::borrow::Cow;
use std::fmt;

use tabula_foundation::{PropertyType, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identifier of an external resource.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResourceId(u64);

impl ResourceId {
    /// Creates a resource identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceId({})", self.0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "res{}", self.0)
    }
}

/// Cache key of a derived schema: a resource at one version.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResourceKey {
    /// Resource identity.
    pub id: ResourceId,
    /// Version (frame index or epoch) the fields were read at.
    pub version: u64,
}

impl ResourceKey {
    /// Creates a key.
    #[must_use]
    pub const fn new(id: ResourceId, version: u64) -> Self {
        Self { id, version }
    }

    /// Reads the current key of a source.
    #[must_use]
    pub fn of(source: &dyn SchemaSource) -> Self {
        Self::new(source.resource_id(), source.version())
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.version)
    }
}

/// How a resource field is stored on the record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FieldKind {
    /// A binding slot holding another resource.
    Texture,
    /// A value stored in the record's custom-property blob.
    Constant,
}

/// One field declared by a resource.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResourceField {
    /// Field name.
    pub name: Cow<'static, str>,
    /// Type tag; always `Resource` for textures.
    pub ty: PropertyType,
    /// Storage kind.
    pub kind: FieldKind,
    /// Initial bytes of a constant, little endian. Shorter defaults are
    /// zero-padded; longer ones are truncated.
    pub default: Vec<u8>,
}

impl ResourceField {
    /// Declares a texture slot.
    #[must_use]
    pub fn texture(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ty: PropertyType::Resource,
            kind: FieldKind::Texture,
            default: Vec::new(),
        }
    }

    /// Declares a constant with raw default bytes.
    #[must_use]
    pub fn constant(
        name: impl Into<Cow<'static, str>>,
        ty: PropertyType,
        default: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            ty,
            kind: FieldKind::Constant,
            default: default.into(),
        }
    }

    /// Declares a float constant, vector or matrix with default lanes.
    #[must_use]
    pub fn floats(name: impl Into<Cow<'static, str>>, ty: PropertyType, default: &[f32]) -> Self {
        let bytes: Vec<u8> = default.iter().flat_map(|v| v.to_le_bytes()).collect();
        Self::constant(name, ty, bytes)
    }
}

/// A resource that can describe the fields it adds to a record.
pub trait SchemaSource {
    /// Stable identity of the resource.
    fn resource_id(&self) -> ResourceId;

    /// Current version; must change whenever [`describe`](Self::describe)
    /// may return different fields.
    fn version(&self) -> u64;

    /// Lists the fields the resource contributes, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource metadata cannot be read.
    fn describe(&self) -> Result<Vec<ResourceField>>;
}

/// An in-memory field list, standing in for a compiled shader.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShaderManifest {
    id: ResourceId,
    version: u64,
    fields: Vec<ResourceField>,
}

impl ShaderManifest {
    /// Creates an empty manifest at version 0.
    #[must_use]
    pub fn new(id: ResourceId) -> Self {
        Self {
            id,
            version: 0,
            fields: Vec::new(),
        }
    }

    /// Builder method to add a field.
    #[must_use]
    pub fn with_field(mut self, field: ResourceField) -> Self {
        self.fields.push(field);
        self
    }

    /// Builder method to add a texture slot.
    #[must_use]
    pub fn with_texture(self, name: impl Into<Cow<'static, str>>) -> Self {
        self.with_field(ResourceField::texture(name))
    }

    /// Builder method to set the version.
    #[must_use]
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Returns the declared fields.
    #[must_use]
    pub fn fields(&self) -> &[ResourceField] {
        &self.fields
    }

    /// Replaces the field list and advances the version.
    pub fn recompile(&mut self, fields: Vec<ResourceField>) {
        self.fields = fields;
        self.version += 1;
    }
}

impl SchemaSource for ShaderManifest {
    fn resource_id(&self) -> ResourceId {
        self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn describe(&self) -> Result<Vec<ResourceField>> {
        Ok(self.fields.clone())
    }
}
