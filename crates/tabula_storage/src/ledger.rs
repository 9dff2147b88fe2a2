//! Change tracking for component tables.
//!
//! The ledger keeps three things for consuming systems:
//! - one-shot queues of added and removed entities,
//! - a bitmask summarising what kind of changes happened since the last clear,
//! - a wrapping generation counter bumped on every structural or content change.
//!
//! Alongside the public bits the mask carries one private bit meaning "some
//! record was written since the last updated-scan". It gates the linear scan
//! for dirty records and is never visible through [`ChangeFlags`].

use bitflags::bitflags;
use tabula_foundation::EntityId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// Kinds of changes recorded since the flags were last cleared.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct ChangeFlags: u32 {
        /// At least one component was added.
        const ADDED = 1 << 0;
        /// At least one component was removed.
        const REMOVED = 1 << 1;
        /// At least one component was written.
        const UPDATED = 1 << 2;
    }
}

const PENDING_SCAN: u32 = 1 << 31;

#[derive(Clone, Debug, Default)]
pub(crate) struct ChangeLedger {
    added: Vec<EntityId>,
    removed: Vec<EntityId>,
    bits: u32,
    generation: u32,
}

impl ChangeLedger {
    pub(crate) fn record_added(&mut self, entity: EntityId) {
        self.added.push(entity);
        self.bits |= ChangeFlags::ADDED.bits();
        self.bump();
    }

    pub(crate) fn record_removed(&mut self, entity: EntityId) {
        self.removed.push(entity);
        self.bits |= ChangeFlags::REMOVED.bits();
        self.bump();
    }

    pub(crate) fn record_updated(&mut self) {
        self.bits |= ChangeFlags::UPDATED.bits() | PENDING_SCAN;
        self.bump();
    }

    pub(crate) fn bump(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Clears the private scan bit, returning whether it was set.
    pub(crate) fn take_pending_scan(&mut self) -> bool {
        let pending = self.bits & PENDING_SCAN != 0;
        self.bits &= !PENDING_SCAN;
        pending
    }

    pub(crate) fn take_added(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.added)
    }

    pub(crate) fn take_removed(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.removed)
    }

    pub(crate) fn flags(&self) -> ChangeFlags {
        ChangeFlags::from_bits_truncate(self.bits)
    }

    /// Clears the public bits; the scan gate survives.
    pub(crate) fn clear_flags(&mut self) {
        self.bits &= PENDING_SCAN;
    }

    pub(crate) fn generation(&self) -> u32 {
        self.generation
    }
}
