//! Dense, change-tracked component tables.
//!
//! A [`ComponentTable`] keeps one record per entity in a contiguous vector and
//! finds records through an entity→index map. Destroying a component only
//! frees its slot; [`ComponentTable::gc`] later fills holes by moving records
//! from the tail, which invalidates any [`ComponentId`] captured earlier.

use std::collections::HashMap;
use std::sync::Arc;

use tabula_foundation::{ComponentId, EntityId, Error, ErrorContext, Result};

use crate::component::{Component, Record};
use crate::config::TableConfig;
use crate::handle::{ComponentMut, ComponentRef};
use crate::ledger::{ChangeFlags, ChangeLedger};
use crate::schema::PropertySchema;

/// Storage for every component of type `T`.
#[derive(Clone, Debug)]
pub struct ComponentTable<T: Component> {
    config: TableConfig,
    schema: Arc<PropertySchema>,
    records: Vec<Record<T>>,
    lookup: HashMap<EntityId, ComponentId>,
    ledger: ChangeLedger,
    /// Slots freed by `destroy` and not yet compacted.
    free_slots: usize,
}

impl<T: Component> Default for ComponentTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ComponentTable<T> {
    /// Creates an empty table labelled with the component's type name.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TableConfig::named(T::TYPE_NAME))
    }

    /// Creates an empty table with the given configuration.
    #[must_use]
    pub fn with_config(config: TableConfig) -> Self {
        Self {
            records: Vec::with_capacity(config.initial_capacity),
            lookup: HashMap::with_capacity(config.initial_capacity),
            schema: Arc::new(T::schema()),
            ledger: ChangeLedger::default(),
            free_slots: 0,
            config,
        }
    }

    /// Returns the table configuration.
    #[must_use]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Returns the static schema of `T`.
    #[must_use]
    pub fn schema(&self) -> &Arc<PropertySchema> {
        &self.schema
    }

    // --- Structure ---

    /// Creates a default component for `entity`.
    ///
    /// If the entity already has a component, that component is reset to the
    /// default value in place and no ADDED event is recorded. Either way the
    /// record goes through one write commit, so it is reported as updated on
    /// the next poll.
    ///
    /// # Errors
    ///
    /// Returns an error if `entity` is the null entity.
    pub fn create(&mut self, entity: EntityId) -> Result<ComponentId> {
        if entity.is_null() {
            return Err(Error::invalid_entity(entity).with_context(self.context("create")));
        }

        let existing = self.lookup.get(&entity).copied();
        let id = if let Some(id) = existing {
            log::trace!("{}: resetting component of {entity:?}", self.config.label);
            id
        } else {
            let id = ComponentId::new(self.records.len());
            self.records.push(Record::new(entity));
            self.lookup.insert(entity, id);
            self.ledger.record_added(entity);
            log::trace!("{}: added {entity:?} at {id}", self.config.label);
            id
        };

        if let Some(mut record) = self.write_by_id(id) {
            if existing.is_some() {
                *record = T::default();
            }
        }
        Ok(id)
    }

    /// Destroys the component of `entity`.
    ///
    /// Returns false if the entity has no component. The slot stays allocated
    /// until the next [`gc`](Self::gc).
    pub fn destroy(&mut self, entity: EntityId) -> bool {
        let Some(id) = self.lookup.remove(&entity) else {
            return false;
        };

        let record = &mut self.records[id.index()];
        record.entity = EntityId::null();
        record.dirty = false;
        record.data = T::default();
        self.free_slots += 1;
        self.ledger.record_removed(entity);

        log::trace!("{}: removed {entity:?} from {id}", self.config.label);
        true
    }

    /// Destroys every component in the table.
    pub fn clear(&mut self) {
        let entities: Vec<_> = self.entities().collect();
        for entity in entities {
            self.destroy(entity);
        }
    }

    /// Compacts storage by moving live tail records into freed slots.
    ///
    /// Does nothing until the number of freed slots reaches the configured
    /// threshold. Survivors do not keep their relative order. Returns the
    /// number of slots reclaimed.
    pub fn gc(&mut self) -> usize {
        if self.free_slots == 0 || self.free_slots < self.config.gc_threshold {
            return 0;
        }

        let before = self.records.len();
        let mut len = before;
        let mut cursor = 0;

        while cursor < len {
            if self.records[cursor].is_live() {
                cursor += 1;
                continue;
            }

            while len > cursor && !self.records[len - 1].is_live() {
                len -= 1;
            }
            if len == cursor {
                break;
            }

            self.records.swap(cursor, len - 1);
            self.lookup
                .insert(self.records[cursor].entity, ComponentId::new(cursor));
            len -= 1;
            cursor += 1;
        }

        self.records.truncate(len);
        let reclaimed = before - len;
        debug_assert_eq!(reclaimed, self.free_slots);
        debug_assert_eq!(self.records.len(), self.lookup.len());
        self.free_slots = 0;

        if reclaimed > 0 {
            self.ledger.bump();
            log::debug!(
                "{}: compacted {reclaimed} slots, {len} live",
                self.config.label
            );
        }
        reclaimed
    }

    // --- Lookup ---

    /// Returns the dense id of `entity`'s component.
    #[must_use]
    pub fn component_id(&self, entity: EntityId) -> Option<ComponentId> {
        self.lookup.get(&entity).copied()
    }

    /// Returns the entity owning the record at `id`.
    ///
    /// Returns `None` for out-of-range ids and for freed slots.
    #[must_use]
    pub fn entity(&self, id: ComponentId) -> Option<EntityId> {
        self.records
            .get(id.index())
            .filter(|r| r.is_live())
            .map(|r| r.entity)
    }

    /// Checks if `entity` has a component in this table.
    #[must_use]
    pub fn has_component(&self, entity: EntityId) -> bool {
        self.lookup.contains_key(&entity)
    }

    /// Number of live components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    /// Returns true if the table has no live components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Number of allocated slots, live or freed.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    /// Number of freed slots waiting for compaction.
    #[must_use]
    pub fn free_slots(&self) -> usize {
        self.free_slots
    }

    /// Iterates entities that have a component, in storage order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.records.iter().filter(|r| r.is_live()).map(|r| r.entity)
    }

    /// Iterates live components, in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> + '_ {
        self.records
            .iter()
            .filter(|r| r.is_live())
            .map(|r| (r.entity, &r.data))
    }

    // --- Values ---

    /// Returns a copy of `entity`'s component.
    #[must_use]
    pub fn get(&self, entity: EntityId) -> Option<T> {
        self.read(entity).map(|c| (*c).clone())
    }

    /// Returns a copy of the record at `id`.
    ///
    /// Returns `None` for out-of-range ids and for freed slots.
    #[must_use]
    pub fn get_by_id(&self, id: ComponentId) -> Option<T> {
        self.read_by_id(id).map(|c| (*c).clone())
    }

    /// Creates or overwrites `entity`'s component.
    ///
    /// # Errors
    ///
    /// Returns an error if `entity` is the null entity.
    pub fn set(&mut self, entity: EntityId, data: T) -> Result<ComponentId> {
        let id = match self.component_id(entity) {
            Some(id) => id,
            None => self.create(entity)?,
        };
        if let Some(mut record) = self.write_by_id(id) {
            *record = data;
        }
        Ok(id)
    }

    /// Overwrites the record at `id`.
    ///
    /// Returns false if `id` is out of range or its slot was freed.
    pub fn set_by_id(&mut self, id: ComponentId, data: T) -> bool {
        if self.entity(id).is_none() {
            return false;
        }
        match self.write_by_id(id) {
            Some(mut record) => {
                *record = data;
                true
            }
            None => false,
        }
    }

    // --- Scoped handles ---

    /// Borrows `entity`'s component.
    #[must_use]
    pub fn read(&self, entity: EntityId) -> Option<ComponentRef<'_, T>> {
        self.read_by_id(self.component_id(entity)?)
    }

    /// Borrows the record at `id`. Freed slots are not readable.
    #[must_use]
    pub fn read_by_id(&self, id: ComponentId) -> Option<ComponentRef<'_, T>> {
        self.records
            .get(id.index())
            .filter(|r| r.is_live())
            .map(ComponentRef::new)
    }

    /// Mutably borrows `entity`'s component; the write commits on drop.
    #[must_use]
    pub fn write(&mut self, entity: EntityId) -> Option<ComponentMut<'_, T>> {
        let id = self.component_id(entity)?;
        self.write_by_id(id)
    }

    /// Mutably borrows the record at `id`; the write commits on drop.
    ///
    /// A write to a freed slot still advances the record's generation but is
    /// not reported as an update.
    #[must_use]
    pub fn write_by_id(&mut self, id: ComponentId) -> Option<ComponentMut<'_, T>> {
        let record = self.records.get_mut(id.index())?;
        Some(ComponentMut::new(record, &mut self.ledger))
    }

    // --- Change polling ---

    /// Drains the entities whose components were added since the last call.
    pub fn added_components(&mut self) -> Vec<EntityId> {
        self.ledger.take_added()
    }

    /// Drains the entities whose components were removed since the last call.
    pub fn removed_components(&mut self) -> Vec<EntityId> {
        self.ledger.take_removed()
    }

    /// Collects entities written since the last call and clears their dirty flags.
    ///
    /// Returns immediately when nothing was written; otherwise scans every
    /// record once.
    pub fn updated_components(&mut self) -> Vec<EntityId> {
        if !self.ledger.take_pending_scan() {
            return Vec::new();
        }
        self.records
            .iter_mut()
            .filter(|r| r.dirty)
            .map(|r| {
                r.dirty = false;
                r.entity
            })
            .collect()
    }

    /// Returns the kinds of changes recorded since the last clear.
    #[must_use]
    pub fn modified_flags(&self) -> ChangeFlags {
        self.ledger.flags()
    }

    /// Clears the modified flags.
    ///
    /// Consumers call this after fully processing a poll; until then flags
    /// accumulate across frames.
    pub fn clear_modified_flags(&mut self) {
        self.ledger.clear_flags();
    }

    /// Returns the table-wide change counter.
    ///
    /// The counter wraps and is only meaningful compared for equality with a
    /// value read earlier from the same table.
    #[must_use]
    pub fn generation_counter(&self) -> u32 {
        self.ledger.generation()
    }

    fn context(&self, operation: &str) -> ErrorContext {
        ErrorContext::new()
            .with_table(&*self.config.label)
            .with_operation(operation)
    }
}
