//! Scoped access to a single record.
//!
//! [`ComponentRef`] borrows its table shared and [`ComponentMut`] borrows it
//! exclusively, so "one writer or any number of readers" holds by
//! construction. Dropping a [`ComponentMut`] commits the write: the record's
//! generation advances and, if the record still belongs to an entity, the
//! record is marked dirty and the table's ledger notes an update.

use std::fmt;
use std::ops::{Deref, DerefMut};

use tabula_foundation::EntityId;

use crate::component::Record;
use crate::ledger::ChangeLedger;

/// Shared view of one record.
pub struct ComponentRef<'a, T> {
    record: &'a Record<T>,
}

impl<'a, T> ComponentRef<'a, T> {
    pub(crate) fn new(record: &'a Record<T>) -> Self {
        Self { record }
    }

    /// Entity owning the record; null if the record was destroyed.
    #[must_use]
    pub fn entity(&self) -> EntityId {
        self.record.entity
    }

    /// Number of committed writes to this record.
    #[must_use]
    pub fn generation(&self) -> u32 {
        self.record.generation
    }

    /// Returns true if a write has not yet been drained as an update.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.record.dirty
    }

    /// Returns the borrowed data with the full table lifetime.
    #[must_use]
    pub fn into_inner(self) -> &'a T {
        &self.record.data
    }
}

impl<T> Deref for ComponentRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.record.data
    }
}

impl<T: fmt::Debug> fmt::Debug for ComponentRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRef")
            .field("entity", &self.record.entity)
            .field("generation", &self.record.generation)
            .field("data", &self.record.data)
            .finish()
    }
}

/// Exclusive view of one record; the write commits on drop.
pub struct ComponentMut<'a, T> {
    record: &'a mut Record<T>,
    ledger: &'a mut ChangeLedger,
}

impl<'a, T> ComponentMut<'a, T> {
    pub(crate) fn new(record: &'a mut Record<T>, ledger: &'a mut ChangeLedger) -> Self {
        Self { record, ledger }
    }

    /// Entity owning the record; null if the record was destroyed.
    #[must_use]
    pub fn entity(&self) -> EntityId {
        self.record.entity
    }

    /// Generation before this write commits.
    #[must_use]
    pub fn generation(&self) -> u32 {
        self.record.generation
    }
}

impl<T> Deref for ComponentMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.record.data
    }
}

impl<T> DerefMut for ComponentMut<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.record.data
    }
}

impl<T> Drop for ComponentMut<'_, T> {
    fn drop(&mut self) {
        self.record.generation = self.record.generation.wrapping_add(1);
        // Writes to a destroyed slot are not reported.
        if self.record.is_live() {
            self.record.dirty = true;
            self.ledger.record_updated();
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ComponentMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentMut")
            .field("entity", &self.record.entity)
            .field("generation", &self.record.generation)
            .field("data", &self.record.data)
            .finish()
    }
}
