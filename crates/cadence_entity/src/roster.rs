//! In-memory entity storage for managers.
//!
//! A [`Roster`] is the plain flavor of entity storage: an insertion-ordered
//! collection where an entity's slot is its position. Registration is the
//! only runtime write path; the collection never shrinks except through
//! [`Roster::clear`] at teardown.

use crate::slot::{Entity, SlotIndex};

/// Insertion-ordered entity storage with stable slots.
#[derive(Debug)]
pub struct Roster<E: Entity> {
    entities: Vec<E>,
}

impl<E: Entity> Roster<E> {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
        }
    }

    /// Append an entity, assign it the next slot, and return that slot.
    ///
    /// Slots are monotonically increasing starting at 0. Registration always
    /// succeeds; callers register each entity exactly once, at creation time.
    pub fn register(&mut self, mut entity: E) -> SlotIndex {
        let slot = SlotIndex::from_raw(self.entities.len());
        entity.assign_slot(slot);
        self.entities.push(entity);
        slot
    }

    /// Returns the number of registered entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if no entities are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns the entity in the given slot, if any.
    #[must_use]
    pub fn get(&self, slot: SlotIndex) -> Option<&E> {
        self.entities.get(slot.index())
    }

    /// Returns the entity in the given slot mutably, if any.
    pub fn get_mut(&mut self, slot: SlotIndex) -> Option<&mut E> {
        self.entities.get_mut(slot.index())
    }

    /// Visit every `(slot, entity)` pair in collection order.
    ///
    /// The count is captured when the call starts; the callback must not
    /// grow the roster.
    pub fn for_each(&mut self, mut callback: impl FnMut(SlotIndex, &mut E)) {
        let count = self.entities.len();
        for i in 0..count {
            callback(SlotIndex::from_raw(i), &mut self.entities[i]);
        }
    }

    /// Iterate entities in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.entities.iter()
    }

    /// Remove every entity. Used at teardown only.
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

impl<E: Entity> Default for Roster<E> {
    fn default() -> Self {
        Self::new()
    }
}
