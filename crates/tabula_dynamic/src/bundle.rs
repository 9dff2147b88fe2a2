//! Schemas derived from a record type plus one external resource.

use tabula_foundation::{Error, PropertyType, Result};
use tabula_storage::{PropertyDescriptor, PropertySchema};

use crate::resource::{FieldKind, ResourceKey, SchemaSource};

/// Largest alignment of a constant within the blob.
const MAX_ALIGN: usize = 16;

/// A derived schema shared by every record bound to the same resource version.
///
/// Static fields of the record type come first, unchanged. Resource fields
/// follow, flagged `DYNAMIC`: textures become `Resource` properties whose
/// offset is their slot index, and constants are laid out in a byte blob
/// with std140-style alignment (power of two of the size, at most 16).
#[derive(Debug, PartialEq)]
pub struct SchemaBundle {
    key: ResourceKey,
    schema: PropertySchema,
    static_count: usize,
    /// Schema indices of texture slots, in slot order.
    slots: Vec<usize>,
    /// Schema indices of constants.
    constants: Vec<usize>,
    defaults: Vec<u8>,
}

impl SchemaBundle {
    /// Derives the schema of `base` extended by the fields of `source`.
    ///
    /// # Errors
    ///
    /// Fails if the source cannot describe itself, if a field name is
    /// declared twice, or if a constant has no fixed byte size.
    pub fn derive(base: &PropertySchema, source: &dyn SchemaSource) -> Result<Self> {
        let key = ResourceKey::of(source);
        let fields = source.describe()?;

        let mut schema = base.clone();
        let static_count = schema.len();
        let mut slots = Vec::new();
        let mut constants = Vec::new();
        let mut defaults = Vec::new();

        for field in fields {
            if schema.find(&field.name).is_some() {
                return Err(Error::schema_derivation(format!(
                    "{key}: field `{}` is declared twice",
                    field.name
                )));
            }

            let descriptor = match field.kind {
                FieldKind::Texture => {
                    slots.push(schema.len());
                    PropertyDescriptor::new(field.name, slots.len() - 1, PropertyType::Resource)
                }
                FieldKind::Constant => {
                    let Some(size) = field.ty.byte_size() else {
                        return Err(Error::schema_derivation(format!(
                            "{key}: constant `{}` of type {} has no fixed size",
                            field.name, field.ty
                        )));
                    };
                    let offset = defaults.len().next_multiple_of(alignment(size));
                    defaults.resize(offset + size, 0);
                    let len = field.default.len().min(size);
                    defaults[offset..offset + len].copy_from_slice(&field.default[..len]);

                    constants.push(schema.len());
                    PropertyDescriptor::new(field.name, offset, field.ty)
                }
            };
            schema = schema.with_property(descriptor.dynamic());
        }
        defaults.resize(defaults.len().next_multiple_of(MAX_ALIGN), 0);

        log::debug!(
            "derived {} for {key}: {} slots, {} constants, {} byte blob",
            schema.type_name(),
            slots.len(),
            constants.len(),
            defaults.len()
        );
        Ok(Self {
            key,
            schema,
            static_count,
            slots,
            constants,
            defaults,
        })
    }

    /// Resource version the bundle was derived from.
    #[must_use]
    pub fn key(&self) -> ResourceKey {
        self.key
    }

    /// Full schema: static fields, then resource fields.
    #[must_use]
    pub fn schema(&self) -> &PropertySchema {
        &self.schema
    }

    /// Fields of the record type itself.
    #[must_use]
    pub fn static_properties(&self) -> &[PropertyDescriptor] {
        &self.schema.as_slice()[..self.static_count]
    }

    /// Fields contributed by the resource.
    #[must_use]
    pub fn dynamic_properties(&self) -> &[PropertyDescriptor] {
        &self.schema.as_slice()[self.static_count..]
    }

    /// Number of texture slots.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Texture slot descriptors, in slot order.
    pub fn slots(&self) -> impl Iterator<Item = &PropertyDescriptor> + '_ {
        self.slots.iter().filter_map(|&i| self.schema.get(i))
    }

    /// Slot index of the named texture.
    #[must_use]
    pub fn slot_index(&self, name: &str) -> Option<usize> {
        self.slots().position(|d| d.name == name)
    }

    /// Constant descriptors; offsets point into the blob.
    pub fn constants(&self) -> impl Iterator<Item = &PropertyDescriptor> + '_ {
        self.constants.iter().filter_map(|&i| self.schema.get(i))
    }

    /// Descriptor of the named constant.
    #[must_use]
    pub fn constant(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.constants().find(|d| d.name == name)
    }

    /// Size of the custom-property blob, a multiple of 16.
    #[must_use]
    pub fn blob_size(&self) -> usize {
        self.defaults.len()
    }

    /// Blob holding every constant's default value.
    #[must_use]
    pub fn default_blob(&self) -> &[u8] {
        &self.defaults
    }
}

fn alignment(size: usize) -> usize {
    size.next_power_of_two().min(MAX_ALIGN)
}
