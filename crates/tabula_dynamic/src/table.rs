//! Component tables whose records carry resource-derived schemas.

use std::any::Any;

use tabula_foundation::{ComponentId, EntityId, Error, ErrorContext, Result, TypeHash};
use tabula_storage::{
    ChangeFlags, Component, ComponentBox, ComponentManager, ComponentTable, PropertyDescriptor,
    PropertySchema, TableConfig,
};

use crate::cache::SchemaCache;
use crate::config::SchemaCacheConfig;
use crate::properties::{DynamicProperties, SlotValue};
use crate::resource::{ResourceId, ResourceKey, SchemaSource};

/// A component that embeds [`DynamicProperties`].
pub trait DynamicComponent: Component {
    /// Resource-derived fields of the record.
    fn dynamic(&self) -> &DynamicProperties;

    /// Resource-derived fields of the record, mutably.
    fn dynamic_mut(&mut self) -> &mut DynamicProperties;
}

/// A component table plus the schema cache its records share.
///
/// Binding a record to a resource goes through the table's write path, so a
/// schema change is reported by `updated_components` like any other write.
#[derive(Debug)]
pub struct DynamicTable<T: DynamicComponent> {
    table: ComponentTable<T>,
    cache: SchemaCache,
}

impl<T: DynamicComponent> Default for DynamicTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DynamicComponent> DynamicTable<T> {
    /// Creates an empty table with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TableConfig::named(T::TYPE_NAME), SchemaCacheConfig::default())
    }

    /// Creates an empty table with the given configuration.
    #[must_use]
    pub fn with_config(table: TableConfig, cache: SchemaCacheConfig) -> Self {
        Self {
            table: ComponentTable::with_config(table),
            cache: SchemaCache::with_config(cache),
        }
    }

    /// Returns the underlying table.
    #[must_use]
    pub fn table(&self) -> &ComponentTable<T> {
        &self.table
    }

    /// Returns the underlying table mutably.
    #[must_use]
    pub fn table_mut(&mut self) -> &mut ComponentTable<T> {
        &mut self.table
    }

    /// Returns the schema cache.
    #[must_use]
    pub fn cache(&self) -> &SchemaCache {
        &self.cache
    }

    /// Binds `entity`'s record to the current version of `source`.
    ///
    /// Returns false when the record is already bound to that version.
    /// If the schema cannot be derived, the record falls back to the static
    /// schema and the failure is logged; the version is still recorded so it
    /// is not derived again.
    ///
    /// # Errors
    ///
    /// Returns an error if `entity` has no component in this table.
    pub fn bind(&mut self, entity: EntityId, source: &dyn SchemaSource) -> Result<bool> {
        let Some(current) = self.table.read(entity) else {
            return Err(Error::component_not_found(entity, T::TYPE_NAME)
                .with_context(self.context("bind")));
        };
        if !current.dynamic().is_stale(source) {
            return Ok(false);
        }

        let key = ResourceKey::of(source);
        let bundle = match self.cache.acquire(self.table.schema(), source) {
            Ok(bundle) => Some(bundle),
            Err(err) => {
                log::warn!(
                    "{}: using static schema for {entity:?} bound to {key}: {err}",
                    self.table.config().label
                );
                None
            }
        };

        if let Some(mut record) = self.table.write(entity) {
            let properties = record.dynamic_mut();
            match bundle {
                Some(bundle) => {
                    properties.rebind(bundle);
                }
                None => properties.fall_back(key),
            }
        }
        Ok(true)
    }

    /// Returns `entity`'s record to its static schema and forgets its
    /// resource key.
    ///
    /// Returns false if the entity has no component or its record carries no
    /// resource key. A record that fell back to the static schema after a
    /// failed derivation still carries its key, so it is cleared and true is
    /// returned.
    pub fn unbind(&mut self, entity: EntityId) -> bool {
        if self.properties(entity).and_then(DynamicProperties::key).is_none() {
            return false;
        }
        if let Some(mut record) = self.table.write(entity) {
            record.dynamic_mut().reset();
        }
        log::trace!("{}: unbound {entity:?}", self.table.config().label);
        true
    }

    /// Rebinds every bound record whose resource has a newer version.
    ///
    /// `resolve` maps a resource id to its current state; records whose
    /// resource no longer resolves are unbound. Returns the number of records
    /// whose schema changed.
    pub fn refresh_all<'s, F>(&mut self, mut resolve: F) -> usize
    where
        F: FnMut(ResourceId) -> Option<&'s dyn SchemaSource>,
    {
        let bound: Vec<(EntityId, ResourceId)> = self
            .table
            .iter()
            .filter_map(|(entity, record)| Some((entity, record.dynamic().key()?.id)))
            .collect();

        let mut changed = 0;
        for (entity, id) in bound {
            let rebound = match resolve(id) {
                Some(source) => matches!(self.bind(entity, source), Ok(true)),
                None => self.unbind(entity),
            };
            if rebound {
                changed += 1;
            }
        }
        self.cache.prune();

        if changed > 0 {
            log::debug!(
                "{}: refreshed {changed} records, {} live bundles",
                self.table.config().label,
                self.cache.live_bundles()
            );
        }
        changed
    }

    /// Resource-derived fields of `entity`'s record.
    #[must_use]
    pub fn properties(&self, entity: EntityId) -> Option<&DynamicProperties> {
        self.table
            .read(entity)
            .map(|record| record.into_inner().dynamic())
    }

    /// Effective schema of `entity`'s record.
    #[must_use]
    pub fn schema_of(&self, entity: EntityId) -> Option<&PropertySchema> {
        let properties = self.properties(entity)?;
        Some(properties.schema().unwrap_or(self.table.schema().as_ref()))
    }

    /// Value of a texture slot on `entity`'s record.
    #[must_use]
    pub fn slot(&self, entity: EntityId, name: &str) -> Option<SlotValue> {
        self.properties(entity)?.slot(name)
    }

    /// Sets a texture slot on `entity`'s record.
    ///
    /// Returns false, without recording a write, if the record has no such slot.
    pub fn set_slot(&mut self, entity: EntityId, name: &str, value: SlotValue) -> bool {
        if self.slot(entity, name).is_none() {
            return false;
        }
        self.table
            .write(entity)
            .is_some_and(|mut record| record.dynamic_mut().set_slot(name, value))
    }

    /// Float lanes of a constant on `entity`'s record.
    #[must_use]
    pub fn constant_floats(&self, entity: EntityId, name: &str) -> Option<Vec<f32>> {
        self.properties(entity)?.constant_floats(name)
    }

    /// Overwrites a constant on `entity`'s record with float lanes.
    ///
    /// Returns false, without recording a write, if the record has no such
    /// constant or the lane count does not match.
    pub fn set_constant_floats(&mut self, entity: EntityId, name: &str, values: &[f32]) -> bool {
        let fits = self
            .properties(entity)
            .and_then(|p| p.constant(name))
            .is_some_and(|bytes| bytes.len() == values.len() * 4);
        if !fits {
            return false;
        }
        self.table
            .write(entity)
            .is_some_and(|mut record| record.dynamic_mut().set_constant_floats(name, values))
    }

    fn context(&self, operation: &str) -> ErrorContext {
        ErrorContext::new()
            .with_table(&*self.table.config().label)
            .with_operation(operation)
    }
}

impl<T: DynamicComponent> ComponentManager for DynamicTable<T> {
    fn type_hash(&self) -> TypeHash {
        T::TYPE_HASH
    }

    fn type_name(&self) -> &str {
        T::TYPE_NAME
    }

    fn label(&self) -> &str {
        &self.table.config().label
    }

    fn metadata(&self) -> &[PropertyDescriptor] {
        self.table.schema().as_slice()
    }

    fn instance_metadata(&self, entity: EntityId) -> Option<&[PropertyDescriptor]> {
        self.schema_of(entity).map(PropertySchema::as_slice)
    }

    fn len(&self) -> usize {
        self.table.len()
    }

    fn has_component(&self, entity: EntityId) -> bool {
        self.table.has_component(entity)
    }

    fn component_id(&self, entity: EntityId) -> Option<ComponentId> {
        self.table.component_id(entity)
    }

    fn entity(&self, id: ComponentId) -> Option<EntityId> {
        self.table.entity(id)
    }

    fn create(&mut self, entity: EntityId) -> Result<ComponentId> {
        self.table.create(entity)
    }

    fn destroy(&mut self, entity: EntityId) -> bool {
        self.table.destroy(entity)
    }

    fn gc(&mut self) -> usize {
        let reclaimed = self.table.gc();
        self.cache.prune();
        reclaimed
    }

    fn added_components(&mut self) -> Vec<EntityId> {
        self.table.added_components()
    }

    fn removed_components(&mut self) -> Vec<EntityId> {
        self.table.removed_components()
    }

    fn updated_components(&mut self) -> Vec<EntityId> {
        self.table.updated_components()
    }

    fn modified_flags(&self) -> ChangeFlags {
        self.table.modified_flags()
    }

    fn clear_modified_flags(&mut self) {
        self.table.clear_modified_flags();
    }

    fn generation_counter(&self) -> u32 {
        self.table.generation_counter()
    }

    fn create_component(&self) -> ComponentBox {
        self.table.create_component()
    }

    fn clone_component(&self, source: &ComponentBox) -> Option<ComponentBox> {
        self.table.clone_component(source)
    }

    fn component(&self, entity: EntityId) -> Option<ComponentBox> {
        self.table.component(entity)
    }

    fn release(&self, component: ComponentBox) -> Result<()> {
        self.table.release(component)
    }

    fn set_data(&mut self, entity: EntityId, source: &ComponentBox) -> bool {
        self.table.set_data(entity, source)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
