//! Component types and the records that hold them.

use tabula_foundation::{EntityId, TypeHash};

use crate::schema::{PropertyDescriptor, PropertySchema};

/// A record type that can live in a [`ComponentTable`](crate::ComponentTable).
///
/// Implementors name themselves and, optionally, describe their reflected
/// fields. The name is hashed into the layout identity that reflection
/// compares before copying records between tables.
///
/// ```
/// use std::mem::offset_of;
/// use tabula_foundation::PropertyType;
/// use tabula_storage::{Component, PropertyDescriptor};
///
/// #[derive(Clone, Default)]
/// struct Light {
///     color: [f32; 3],
///     range: f32,
/// }
///
/// impl Component for Light {
///     const TYPE_NAME: &'static str = "LightComponent";
///
///     fn properties() -> Vec<PropertyDescriptor> {
///         vec![
///             PropertyDescriptor::new("color", offset_of!(Light, color), PropertyType::Vector(3)),
///             PropertyDescriptor::new("range", offset_of!(Light, range), PropertyType::Float),
///         ]
///     }
/// }
///
/// assert_eq!(Light::schema().len(), 2);
/// ```
pub trait Component: Clone + Default + Send + Sync + 'static {
    /// Unique name of the record type.
    const TYPE_NAME: &'static str;

    /// Layout identity, the content hash of [`Self::TYPE_NAME`].
    const TYPE_HASH: TypeHash = TypeHash::of(Self::TYPE_NAME);

    /// Returns [`Self::TYPE_HASH`].
    #[must_use]
    fn type_hash() -> TypeHash {
        Self::TYPE_HASH
    }

    /// Reflected fields, in declaration order.
    #[must_use]
    fn properties() -> Vec<PropertyDescriptor> {
        Vec::new()
    }

    /// Builds the static schema for this type.
    #[must_use]
    fn schema() -> PropertySchema {
        PropertySchema::from_properties(Self::TYPE_NAME, Self::properties())
    }
}

/// One slot of a component table.
///
/// A slot whose entity is null has been destroyed and waits for compaction.
#[derive(Clone, Debug)]
pub(crate) struct Record<T> {
    pub(crate) entity: EntityId,
    pub(crate) generation: u32,
    pub(crate) dirty: bool,
    pub(crate) data: T,
}

impl<T: Default> Record<T> {
    pub(crate) fn new(entity: EntityId) -> Self {
        Self {
            entity,
            generation: 0,
            dirty: false,
            data: T::default(),
        }
    }
}

impl<T> Record<T> {
    pub(crate) fn is_live(&self) -> bool {
        self.entity.is_valid()
    }
}
