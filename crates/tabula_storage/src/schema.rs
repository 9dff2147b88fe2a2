//! Property schemas describing record layouts.
//!
//! A schema lists the reflected fields of one record type in declaration
//! order. Tooling walks schemas to serialize or inspect records without
//! knowing the concrete type, and tables compare schema identities before
//! copying records between each other.

use std::borrow::Cow;
use std::sync::Arc;

use bitflags::bitflags;
use tabula_foundation::{PropertyType, TypeHash, fnv1a};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// Layout and access flags on a property.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct PropertyFlags: u32 {
        /// The property is a fixed-size array of `count` elements.
        const ARRAY = 1 << 0;
        /// The property is a packed bit set.
        const BITFIELD = 1 << 1;
        /// The property was derived from an external resource.
        const DYNAMIC = 1 << 2;
        /// Tooling should not write the property.
        const READ_ONLY = 1 << 3;
    }
}

/// Description of one reflected field.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PropertyDescriptor {
    /// Field name.
    pub name: Cow<'static, str>,
    /// FNV-1a hash of `name`.
    pub name_hash: u64,
    /// Byte offset within the record (or within the custom-property blob
    /// for dynamic properties).
    pub offset: usize,
    /// Type tag of one element.
    pub ty: PropertyType,
    /// Number of elements; 1 unless the property is an array.
    pub count: usize,
    /// Layout and access flags.
    pub flags: PropertyFlags,
    /// Schema of each element when the elements are themselves structured.
    pub container: Option<Arc<PropertySchema>>,
}

impl PropertyDescriptor {
    /// Creates a scalar property.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>, offset: usize, ty: PropertyType) -> Self {
        let name = name.into();
        Self {
            name_hash: fnv1a(&name),
            name,
            offset,
            ty,
            count: 1,
            flags: PropertyFlags::empty(),
            container: None,
        }
    }

    /// Marks the property as an array of `count` elements.
    #[must_use]
    pub fn array(mut self, count: usize) -> Self {
        self.count = count;
        self.flags |= PropertyFlags::ARRAY;
        self
    }

    /// Marks the property as a bit set.
    #[must_use]
    pub fn bitfield(mut self) -> Self {
        self.flags |= PropertyFlags::BITFIELD;
        self
    }

    /// Marks the property as read-only for tooling.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.flags |= PropertyFlags::READ_ONLY;
        self
    }

    /// Marks the property as resource-derived.
    #[must_use]
    pub fn dynamic(mut self) -> Self {
        self.flags |= PropertyFlags::DYNAMIC;
        self
    }

    /// Attaches the schema used to reflect each element.
    #[must_use]
    pub fn with_container(mut self, container: Arc<PropertySchema>) -> Self {
        self.container = Some(container);
        self
    }

    /// Returns true if the property is an array.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.flags.contains(PropertyFlags::ARRAY)
    }

    /// Returns true if the property was derived from a resource.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.flags.contains(PropertyFlags::DYNAMIC)
    }

    /// Total size in bytes, when the element type has a fixed layout.
    #[must_use]
    pub fn byte_size(&self) -> Option<usize> {
        self.ty.byte_size().map(|size| size * self.count)
    }

    /// Returns true if both descriptors name the same field.
    ///
    /// Identity is `(type, name hash, name)`; offsets are ignored so that a
    /// field keeps its identity when a schema is rebuilt around it.
    #[must_use]
    pub fn same_field(&self, other: &Self) -> bool {
        self.ty == other.ty && self.name_hash == other.name_hash && self.name == other.name
    }
}

/// Ordered set of property descriptors for one record type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PropertySchema {
    type_name: Cow<'static, str>,
    type_hash: TypeHash,
    properties: Vec<PropertyDescriptor>,
}

impl PropertySchema {
    /// Creates an empty schema for the named type.
    #[must_use]
    pub fn new(type_name: impl Into<Cow<'static, str>>) -> Self {
        Self::from_properties(type_name, Vec::new())
    }

    /// Creates a schema from a list of properties.
    #[must_use]
    pub fn from_properties(
        type_name: impl Into<Cow<'static, str>>,
        properties: Vec<PropertyDescriptor>,
    ) -> Self {
        let type_name = type_name.into();
        Self {
            type_hash: TypeHash::of(&type_name),
            type_name,
            properties,
        }
    }

    /// Adds a property to the schema.
    #[must_use]
    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// Name of the described type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Content hash of the type name.
    #[must_use]
    pub fn type_hash(&self) -> TypeHash {
        self.type_hash
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns true if the schema has no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Returns the property at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PropertyDescriptor> {
        self.properties.get(index)
    }

    /// Finds a property by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&PropertyDescriptor> {
        let hash = fnv1a(name);
        self.properties
            .iter()
            .find(|p| p.name_hash == hash && p.name == name)
    }

    /// Returns all properties in declaration order.
    #[must_use]
    pub fn as_slice(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Iterates properties in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, PropertyDescriptor> {
        self.properties.iter()
    }
}

impl<'a> IntoIterator for &'a PropertySchema {
    type Item = &'a PropertyDescriptor;
    type IntoIter = std::slice::Iter<'a, PropertyDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
