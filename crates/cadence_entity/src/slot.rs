//! Slot identity for registrable entities.
//!
//! A [`SlotIndex`] is an entity's position in its owning manager's roster.
//! It is assigned exactly once, at registration, and never changes afterwards
//! — rosters only grow and bulk-clear, they never remove from the middle.

use serde::{Deserialize, Serialize};

/// A stable position in a manager's roster.
///
/// Entities keep their slot for their whole lifetime; managers use it to
/// address per-entity rows in side tables and scratch buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotIndex(pub usize);

impl SlotIndex {
    /// Sentinel for an entity that has not been registered yet.
    pub const UNASSIGNED: SlotIndex = SlotIndex(usize::MAX);

    /// Create a slot index from a raw position.
    #[must_use]
    pub const fn from_raw(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw position.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }

    /// Returns `true` if this slot has been assigned by a roster.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 != usize::MAX
    }
}

impl std::fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Slot({})", self.0)
    }
}

/// The identity contract every registrable item satisfies.
///
/// An entity carries no behavior of its own — it holds the slot its roster
/// assigned it and nothing more. The slot is written once by
/// [`Roster::register`](crate::Roster::register) (or the saved flavor) and
/// must never be changed by the entity afterwards.
pub trait Entity {
    /// The slot this entity was assigned at registration.
    fn slot(&self) -> SlotIndex;

    /// Store the assigned slot. Called exactly once, by the roster.
    fn assign_slot(&mut self, slot: SlotIndex);
}
