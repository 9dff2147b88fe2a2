//! Generational entity allocation for drivers and tests.
//!
//! Component tables never allocate entities; whoever drives them does. The
//! `EntityStore` is a minimal allocator for that role: freed indices are
//! reused with a bumped generation so stale identifiers stop matching.

// Allow u64 to usize casts - we target 64-bit systems
#![allow(clippy::cast_possible_truncation)]

use tabula_foundation::{EntityId, Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Allocates entity identifiers and tracks which ones are alive.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityStore {
    /// Current generation per index. Odd means alive, even means free.
    generations: Vec<u32>,
    /// Indices available for reuse.
    free_list: Vec<u64>,
    live_count: usize,
}

impl EntityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new entity, reusing a freed index when one is available.
    pub fn spawn(&mut self) -> EntityId {
        self.live_count += 1;

        if let Some(index) = self.free_list.pop() {
            let generation = &mut self.generations[index as usize];
            *generation = generation.wrapping_add(1);
            EntityId::new(index, *generation)
        } else {
            let index = self.generations.len() as u64;
            self.generations.push(1);
            EntityId::new(index, 1)
        }
    }

    /// Frees an entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is stale or was never allocated.
    pub fn despawn(&mut self, id: EntityId) -> Result<()> {
        self.validate(id)?;

        let generation = &mut self.generations[id.index as usize];
        *generation = generation.wrapping_add(1);
        self.free_list.push(id.index);
        self.live_count -= 1;
        Ok(())
    }

    /// Checks if an entity is alive.
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.validate(id).is_ok()
    }

    /// Validates that an entity is alive.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for unknown or freed indices and
    /// `StaleEntity` for generation mismatches.
    pub fn validate(&self, id: EntityId) -> Result<()> {
        let Some(&current) = self.generations.get(id.index as usize) else {
            return Err(Error::entity_not_found(id));
        };
        if current != id.generation {
            return Err(Error::stale_entity(id));
        }
        if current % 2 == 0 {
            return Err(Error::entity_not_found(id));
        }
        Ok(())
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live_count
    }

    /// Returns true if no entities are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// Iterates live entities in index order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.generations
            .iter()
            .enumerate()
            .filter(|(_, generation)| *generation % 2 == 1)
            .map(|(index, generation)| EntityId::new(index as u64, *generation))
    }
}
