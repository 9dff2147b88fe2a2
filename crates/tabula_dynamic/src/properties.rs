//! Per-record state of a resource-derived schema.

use std::sync::Arc;

use tabula_storage::PropertySchema;

use crate::bundle::SchemaBundle;
use crate::resource::{ResourceId, ResourceKey, SchemaSource};

/// Value of one texture slot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SlotValue {
    /// Nothing bound; the renderer uses its fallback.
    #[default]
    Unbound,
    /// A resource bound to the slot.
    Bound(ResourceId),
}

/// Resource-derived fields embedded in a record.
///
/// An unbound value follows the record type's static schema only. Binding
/// attaches a shared [`SchemaBundle`] together with per-record slot values
/// and a custom-property blob laid out by that bundle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DynamicProperties {
    key: Option<ResourceKey>,
    bundle: Option<Arc<SchemaBundle>>,
    slots: Vec<SlotValue>,
    blob: Vec<u8>,
}

impl DynamicProperties {
    /// Creates unbound properties.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resource version the record was last bound to.
    ///
    /// Stays set when derivation failed and the record fell back to its
    /// static schema, so the same version is not derived again.
    #[must_use]
    pub fn key(&self) -> Option<ResourceKey> {
        self.key
    }

    /// Shared bundle, if the record has a derived schema.
    #[must_use]
    pub fn bundle(&self) -> Option<&Arc<SchemaBundle>> {
        self.bundle.as_ref()
    }

    /// Derived schema, if any.
    #[must_use]
    pub fn schema(&self) -> Option<&PropertySchema> {
        self.bundle.as_deref().map(SchemaBundle::schema)
    }

    /// Returns true if the record has a derived schema.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.bundle.is_some()
    }

    /// Returns true if `source` has moved on from the version last bound.
    #[must_use]
    pub fn is_stale(&self, source: &dyn SchemaSource) -> bool {
        self.key != Some(ResourceKey::of(source))
    }

    /// Switches to `bundle`, carrying values over by field identity.
    ///
    /// Slot values and constants whose `(type, name hash, name)` exists in
    /// both bundles keep their values; fields only in the old bundle are
    /// dropped and fields only in the new one take defaults. Returns the
    /// number of values carried over.
    pub fn rebind(&mut self, bundle: Arc<SchemaBundle>) -> usize {
        let mut carried = 0;
        let old = self.bundle.take();

        let slots: Vec<SlotValue> = bundle
            .slots()
            .map(|slot| {
                let previous = old.as_deref().and_then(|old| {
                    let index = old.slots().position(|p| p.same_field(slot))?;
                    self.slots.get(index).copied()
                });
                if previous.is_some() {
                    carried += 1;
                }
                previous.unwrap_or_default()
            })
            .collect();

        let mut blob = bundle.default_blob().to_vec();
        if let Some(old) = old.as_deref() {
            for constant in bundle.constants() {
                let Some(previous) = old.constants().find(|p| p.same_field(constant)) else {
                    continue;
                };
                let Some(size) = constant.byte_size().filter(|s| Some(*s) == previous.byte_size())
                else {
                    continue;
                };
                if let Some(bytes) = self.blob.get(previous.offset..previous.offset + size) {
                    blob[constant.offset..constant.offset + size].copy_from_slice(bytes);
                    carried += 1;
                }
            }
        }

        log::trace!(
            "rebound {:?} -> {}, {carried} values carried",
            self.key,
            bundle.key()
        );
        self.key = Some(bundle.key());
        self.slots = slots;
        self.blob = blob;
        self.bundle = Some(bundle);
        carried
    }

    /// Drops the derived schema and every resource value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Drops the derived schema but remembers `key` as handled.
    pub(crate) fn fall_back(&mut self, key: ResourceKey) {
        self.reset();
        self.key = Some(key);
    }

    // --- Slots ---

    /// All slot values, in slot order.
    #[must_use]
    pub fn slots(&self) -> &[SlotValue] {
        &self.slots
    }

    /// Value of the named slot.
    #[must_use]
    pub fn slot(&self, name: &str) -> Option<SlotValue> {
        let index = self.bundle.as_ref()?.slot_index(name)?;
        self.slots.get(index).copied()
    }

    /// Sets the named slot. Returns false if the schema has no such slot.
    pub fn set_slot(&mut self, name: &str, value: SlotValue) -> bool {
        let Some(index) = self.bundle.as_ref().and_then(|b| b.slot_index(name)) else {
            return false;
        };
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    // --- Constants ---

    /// Custom-property blob.
    #[must_use]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    /// Bytes of the named constant.
    #[must_use]
    pub fn constant(&self, name: &str) -> Option<&[u8]> {
        let descriptor = self.bundle.as_ref()?.constant(name)?;
        let size = descriptor.byte_size()?;
        self.blob.get(descriptor.offset..descriptor.offset + size)
    }

    /// Overwrites the named constant.
    ///
    /// Returns false if there is no such constant or `bytes` has the wrong
    /// length.
    pub fn set_constant(&mut self, name: &str, bytes: &[u8]) -> bool {
        let Some(descriptor) = self.bundle.as_ref().and_then(|b| b.constant(name)) else {
            return false;
        };
        if descriptor.byte_size() != Some(bytes.len()) {
            return false;
        }
        let range = descriptor.offset..descriptor.offset + bytes.len();
        match self.blob.get_mut(range) {
            Some(target) => {
                target.copy_from_slice(bytes);
                true
            }
            None => false,
        }
    }

    /// Float lanes of the named constant.
    #[must_use]
    pub fn constant_floats(&self, name: &str) -> Option<Vec<f32>> {
        let bytes = self.constant(name)?;
        Some(
            bytes
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        )
    }

    /// Overwrites the named constant with float lanes.
    pub fn set_constant_floats(&mut self, name: &str, values: &[f32]) -> bool {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.set_constant(name, &bytes)
    }
}
