//! A driver owning one table per component type.
//!
//! The registry is where the once-per-tick duties live: despawning an entity
//! removes its component from every table, and [`Registry::maintain`]
//! compacts every table after consumers have drained their removals.

use std::collections::HashMap;

use tabula_foundation::{EntityId, Error, ErrorKind, Result, TypeHash};

use crate::component::Component;
use crate::entity::EntityStore;
use crate::reflect::ComponentManager;
use crate::table::ComponentTable;

/// Owns an entity allocator and a set of component tables.
#[derive(Default)]
pub struct Registry {
    entities: EntityStore,
    managers: Vec<Box<dyn ComponentManager>>,
    by_type: HashMap<TypeHash, usize>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table.
    ///
    /// # Errors
    ///
    /// Returns an error if a table for the same record type is registered.
    pub fn register<M: ComponentManager>(&mut self, manager: M) -> Result<()> {
        let hash = manager.type_hash();
        if self.by_type.contains_key(&hash) {
            return Err(Error::new(ErrorKind::DuplicateManager(
                manager.type_name().to_owned(),
            )));
        }
        log::debug!("registered table {} ({hash})", manager.label());
        self.by_type.insert(hash, self.managers.len());
        self.managers.push(Box::new(manager));
        Ok(())
    }

    /// Registers an empty table for `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if a table for `T` is already registered.
    pub fn register_component<T: Component>(&mut self) -> Result<()> {
        self.register(ComponentTable::<T>::new())
    }

    /// Returns the table storing `T`.
    #[must_use]
    pub fn table<T: Component>(&self) -> Option<&ComponentTable<T>> {
        self.manager::<ComponentTable<T>>(T::TYPE_HASH)
    }

    /// Returns the table storing `T` mutably.
    #[must_use]
    pub fn table_mut<T: Component>(&mut self) -> Option<&mut ComponentTable<T>> {
        self.manager_mut::<ComponentTable<T>>(T::TYPE_HASH)
    }

    /// Returns the manager for `hash` downcast to `M`.
    #[must_use]
    pub fn manager<M: ComponentManager>(&self, hash: TypeHash) -> Option<&M> {
        self.by_type_hash(hash)?.as_any().downcast_ref()
    }

    /// Returns the manager for `hash` downcast to `M`, mutably.
    #[must_use]
    pub fn manager_mut<M: ComponentManager>(&mut self, hash: TypeHash) -> Option<&mut M> {
        self.by_type_hash_mut(hash)?.as_any_mut().downcast_mut()
    }

    /// Returns the manager storing records of layout `hash`.
    #[must_use]
    pub fn by_type_hash(&self, hash: TypeHash) -> Option<&dyn ComponentManager> {
        let index = *self.by_type.get(&hash)?;
        Some(self.managers[index].as_ref())
    }

    /// Returns the manager storing records of layout `hash`, mutably.
    #[must_use]
    pub fn by_type_hash_mut(&mut self, hash: TypeHash) -> Option<&mut dyn ComponentManager> {
        let index = *self.by_type.get(&hash)?;
        Some(self.managers[index].as_mut())
    }

    /// Iterates registered managers in registration order.
    pub fn managers(&self) -> impl Iterator<Item = &dyn ComponentManager> + '_ {
        self.managers
            .iter()
            .map(|m| -> &dyn ComponentManager { m.as_ref() })
    }

    /// Returns the entity allocator.
    #[must_use]
    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    /// Allocates a new entity.
    pub fn spawn(&mut self) -> EntityId {
        self.entities.spawn()
    }

    /// Checks if an entity is alive.
    #[must_use]
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.entities.is_alive(entity)
    }

    /// Frees an entity and destroys its component in every table.
    ///
    /// Returns the number of components destroyed.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is stale or was never allocated.
    pub fn despawn(&mut self, entity: EntityId) -> Result<usize> {
        self.entities.despawn(entity)?;
        let destroyed = self
            .managers
            .iter_mut()
            .map(|m| m.destroy(entity))
            .filter(|destroyed| *destroyed)
            .count();
        log::trace!("despawned {entity:?}, {destroyed} components");
        Ok(destroyed)
    }

    /// Compacts every table. Returns the total number of reclaimed slots.
    ///
    /// Call once per tick, after consumers have drained removals and no
    /// earlier [`ComponentId`](tabula_foundation::ComponentId) is still used.
    pub fn maintain(&mut self) -> usize {
        self.managers.iter_mut().map(|m| m.gc()).sum()
    }

    /// Sum of every table's generation counter.
    ///
    /// Systems that depend on several tables cache this value and skip work
    /// while it is unchanged.
    #[must_use]
    pub fn generation_stamp(&self) -> u64 {
        self.managers
            .iter()
            .map(|m| u64::from(m.generation_counter()))
            .fold(0, u64::wrapping_add)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("entities", &self.entities.len())
            .field(
                "managers",
                &self.managers.iter().map(|m| m.label()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
