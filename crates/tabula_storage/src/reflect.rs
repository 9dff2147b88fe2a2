//! Type-erased access to component tables.
//!
//! Serialization, inspectors and cross-table copies work on tables they
//! cannot name. [`ComponentManager`] is the object-safe surface they use, and
//! [`ComponentBox`] is the type-erased record they pass around. A box always
//! remembers the layout it was made for, and tables refuse boxes of any other
//! layout.

use std::any::Any;
use std::fmt;

use tabula_foundation::{ComponentId, EntityId, Error, ErrorKind, Result, TypeHash};

use crate::component::Component;
use crate::ledger::ChangeFlags;
use crate::schema::PropertyDescriptor;
use crate::table::ComponentTable;

/// A type-erased record, detached from table storage.
///
/// A box taken from a table with [`ComponentManager::component`] stays
/// *bound* to the entity it was copied from; tables will not release a bound
/// box while that entity still has a component.
pub struct ComponentBox {
    owner: TypeHash,
    bound: EntityId,
    data: Box<dyn Any + Send + Sync>,
}

impl ComponentBox {
    /// Boxes a detached record.
    #[must_use]
    pub fn new<T: Component>(data: T) -> Self {
        Self::bound_to(EntityId::null(), data)
    }

    fn bound_to<T: Component>(entity: EntityId, data: T) -> Self {
        Self {
            owner: T::TYPE_HASH,
            bound: entity,
            data: Box::new(data),
        }
    }

    /// Layout identity of the boxed record.
    #[must_use]
    pub fn owner(&self) -> TypeHash {
        self.owner
    }

    /// Entity the record was copied from, if any.
    #[must_use]
    pub fn bound_entity(&self) -> Option<EntityId> {
        self.bound.is_valid().then_some(self.bound)
    }

    /// Forgets the entity binding.
    pub fn unbind(&mut self) {
        self.bound = EntityId::null();
    }

    /// Borrows the record as `T` if it has that layout.
    #[must_use]
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        if self.owner != T::TYPE_HASH {
            return None;
        }
        self.data.downcast_ref()
    }

    /// Mutably borrows the record as `T` if it has that layout.
    #[must_use]
    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        if self.owner != T::TYPE_HASH {
            return None;
        }
        self.data.downcast_mut()
    }

    /// Unboxes the record as `T`, handing the box back on mismatch.
    ///
    /// # Errors
    ///
    /// Returns the box unchanged if it does not hold a `T`.
    pub fn into_inner<T: Component>(self) -> std::result::Result<T, Self> {
        if self.owner != T::TYPE_HASH || !self.data.is::<T>() {
            return Err(self);
        }
        let Self { owner, bound, data } = self;
        data.downcast::<T>().map(|data| *data).map_err(|data| Self {
            owner,
            bound,
            data,
        })
    }
}

impl fmt::Debug for ComponentBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentBox")
            .field("owner", &self.owner)
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}

/// Object-safe reflection surface of a component table.
pub trait ComponentManager: Any + Send + Sync {
    // --- Schema ---

    /// Layout identity of the stored records.
    fn type_hash(&self) -> TypeHash;

    /// Name of the stored record type.
    fn type_name(&self) -> &str;

    /// Label used for logging.
    fn label(&self) -> &str;

    /// Static properties of the stored record type.
    fn metadata(&self) -> &[PropertyDescriptor];

    /// Number of static properties.
    fn property_count(&self) -> usize {
        self.metadata().len()
    }

    /// Static property at `index`.
    fn metadata_at(&self, index: usize) -> Option<&PropertyDescriptor> {
        self.metadata().get(index)
    }

    /// Effective properties of one entity's record.
    ///
    /// Equal to [`metadata`](Self::metadata) unless the table derives
    /// per-record schemas.
    fn instance_metadata(&self, entity: EntityId) -> Option<&[PropertyDescriptor]> {
        self.has_component(entity).then(|| self.metadata())
    }

    // --- Table ---

    /// Number of live components.
    fn len(&self) -> usize;

    /// Returns true if there are no live components.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks if `entity` has a component.
    fn has_component(&self, entity: EntityId) -> bool;

    /// Dense id of `entity`'s component.
    fn component_id(&self, entity: EntityId) -> Option<ComponentId>;

    /// Entity owning the record at `id`.
    fn entity(&self, id: ComponentId) -> Option<EntityId>;

    /// Creates (or resets) a default component.
    ///
    /// # Errors
    ///
    /// Returns an error if `entity` is the null entity.
    fn create(&mut self, entity: EntityId) -> Result<ComponentId>;

    /// Destroys a component, returning false if there was none.
    fn destroy(&mut self, entity: EntityId) -> bool;

    /// Compacts storage, returning the number of reclaimed slots.
    fn gc(&mut self) -> usize;

    /// Drains added entities.
    fn added_components(&mut self) -> Vec<EntityId>;

    /// Drains removed entities.
    fn removed_components(&mut self) -> Vec<EntityId>;

    /// Collects and clears written entities.
    fn updated_components(&mut self) -> Vec<EntityId>;

    /// Public change bits.
    fn modified_flags(&self) -> ChangeFlags;

    /// Clears the public change bits.
    fn clear_modified_flags(&mut self);

    /// Table-wide change counter.
    fn generation_counter(&self) -> u32;

    // --- Detached records ---

    /// Allocates a detached default record.
    fn create_component(&self) -> ComponentBox;

    /// Duplicates a record of this table's layout, detached.
    fn clone_component(&self, source: &ComponentBox) -> Option<ComponentBox>;

    /// Copies `entity`'s record into a box bound to `entity`.
    fn component(&self, entity: EntityId) -> Option<ComponentBox>;

    /// Frees a box.
    ///
    /// # Errors
    ///
    /// Fails if the box has another layout, or if it is bound to an entity
    /// that still has a component here.
    fn release(&self, component: ComponentBox) -> Result<()>;

    /// Returns true if `component` has this table's layout.
    fn is_matching(&self, component: &ComponentBox) -> bool {
        component.owner() == self.type_hash()
    }

    /// Copies a boxed record into `entity`'s component, creating it if needed.
    ///
    /// Boxes of another layout are rejected and leave the table untouched.
    fn set_data(&mut self, entity: EntityId, source: &ComponentBox) -> bool;

    // --- Downcasting ---

    /// Upcasts to `Any` for downcasting to the concrete table.
    fn as_any(&self) -> &dyn Any;

    /// Upcasts to `Any` for downcasting to the concrete table.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ComponentTable<T> {
    /// Releases a box, checking layout and binding.
    pub(crate) fn release_box(&self, component: ComponentBox) -> Result<()> {
        if component.owner() != T::TYPE_HASH {
            return Err(Error::ownership_mismatch(T::TYPE_HASH, component.owner()));
        }
        if let Some(entity) = component.bound_entity() {
            if self.has_component(entity) {
                log::warn!(
                    "{}: refusing to release component bound to live {entity:?}",
                    self.config().label
                );
                return Err(Error::new(ErrorKind::HandleInUse(entity)));
            }
        }
        Ok(())
    }

    /// Copies a boxed record into `entity`'s component.
    pub(crate) fn set_from_box(&mut self, entity: EntityId, source: &ComponentBox) -> bool {
        let Some(data) = source.downcast_ref::<T>() else {
            log::warn!(
                "{}: rejected record of foreign type {} for {entity:?}",
                self.config().label,
                source.owner()
            );
            return false;
        };
        self.set(entity, data.clone()).is_ok()
    }
}

impl<T: Component> ComponentManager for ComponentTable<T> {
    fn type_hash(&self) -> TypeHash {
        T::TYPE_HASH
    }

    fn type_name(&self) -> &str {
        T::TYPE_NAME
    }

    fn label(&self) -> &str {
        &self.config().label
    }

    fn metadata(&self) -> &[PropertyDescriptor] {
        self.schema().as_slice()
    }

    fn len(&self) -> usize {
        ComponentTable::len(self)
    }

    fn has_component(&self, entity: EntityId) -> bool {
        ComponentTable::has_component(self, entity)
    }

    fn component_id(&self, entity: EntityId) -> Option<ComponentId> {
        ComponentTable::component_id(self, entity)
    }

    fn entity(&self, id: ComponentId) -> Option<EntityId> {
        ComponentTable::entity(self, id)
    }

    fn create(&mut self, entity: EntityId) -> Result<ComponentId> {
        ComponentTable::create(self, entity)
    }

    fn destroy(&mut self, entity: EntityId) -> bool {
        ComponentTable::destroy(self, entity)
    }

    fn gc(&mut self) -> usize {
        ComponentTable::gc(self)
    }

    fn added_components(&mut self) -> Vec<EntityId> {
        ComponentTable::added_components(self)
    }

    fn removed_components(&mut self) -> Vec<EntityId> {
        ComponentTable::removed_components(self)
    }

    fn updated_components(&mut self) -> Vec<EntityId> {
        ComponentTable::updated_components(self)
    }

    fn modified_flags(&self) -> ChangeFlags {
        ComponentTable::modified_flags(self)
    }

    fn clear_modified_flags(&mut self) {
        ComponentTable::clear_modified_flags(self);
    }

    fn generation_counter(&self) -> u32 {
        ComponentTable::generation_counter(self)
    }

    fn create_component(&self) -> ComponentBox {
        ComponentBox::new(T::default())
    }

    fn clone_component(&self, source: &ComponentBox) -> Option<ComponentBox> {
        source
            .downcast_ref::<T>()
            .map(|data| ComponentBox::new(data.clone()))
    }

    fn component(&self, entity: EntityId) -> Option<ComponentBox> {
        let data = self.get(entity)?;
        Some(ComponentBox::bound_to(entity, data))
    }

    fn release(&self, component: ComponentBox) -> Result<()> {
        self.release_box(component)
    }

    fn set_data(&mut self, entity: EntityId, source: &ComponentBox) -> bool {
        self.set_from_box(entity, source)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
