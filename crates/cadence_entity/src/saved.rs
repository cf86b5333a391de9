//! Persisted entity storage.
//!
//! A [`SavedRoster`] is the asset-backed flavor of entity storage. It has the
//! same registration contract as [`Roster`](crate::Roster), with two
//! differences:
//!
//! - Slots may become vacant when an entity's owning object goes away without
//!   deregistering. Enumeration skips vacant slots; it is not an error.
//! - The roster can be written to and restored from a MessagePack snapshot,
//!   so a manager's entity set survives the process. Teardown clears the
//!   collection so an emptied roster is not persisted with stale entries.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::slot::{Entity, SlotIndex};

/// Errors that can occur while snapshotting a saved roster.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Failed to encode the roster to MessagePack.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Failed to decode a roster from MessagePack.
    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// Failed to read or write the snapshot file.
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Insertion-ordered entity storage with vacatable slots and snapshot support.
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedRoster<E> {
    slots: Vec<Option<E>>,
}

impl<E: Entity> SavedRoster<E> {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Append an entity, assign it the next slot, and return that slot.
    ///
    /// Identical contract to the plain roster: monotonically increasing
    /// slots starting at 0, no failure conditions.
    pub fn register(&mut self, mut entity: E) -> SlotIndex {
        let slot = SlotIndex::from_raw(self.slots.len());
        entity.assign_slot(slot);
        self.slots.push(Some(entity));
        slot
    }

    /// Mark a slot vacant, keeping later slots stable.
    ///
    /// Returns `true` if the slot held an entity. Vacating an already-vacant
    /// or out-of-range slot is a no-op.
    pub fn vacate(&mut self, slot: SlotIndex) -> bool {
        match self.slots.get_mut(slot.index()) {
            Some(occupant) => occupant.take().is_some(),
            None => false,
        }
    }

    /// Returns the number of slots, vacant ones included.
    ///
    /// This matches the registration count since the last clear, which is
    /// what per-slot side tables are sized against.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of slots still holding an entity.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Returns the entity in the given slot, if present.
    #[must_use]
    pub fn get(&self, slot: SlotIndex) -> Option<&E> {
        self.slots.get(slot.index()).and_then(Option::as_ref)
    }

    /// Visit every occupied `(slot, entity)` pair in collection order,
    /// skipping vacant slots.
    ///
    /// The count is captured when the call starts; the callback must not
    /// grow the roster.
    pub fn for_each(&mut self, mut callback: impl FnMut(SlotIndex, &mut E)) {
        let count = self.slots.len();
        for i in 0..count {
            if let Some(entity) = self.slots[i].as_mut() {
                callback(SlotIndex::from_raw(i), entity);
            }
        }
    }

    /// Remove every slot. Used at teardown so an empty roster is what gets
    /// persisted, not a list of vacant entries.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<E> SavedRoster<E>
where
    E: Serialize + for<'de> Deserialize<'de>,
{
    /// Encode the roster to MessagePack bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Encode`] if serialisation fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(rmp_serde::to_vec(&self.slots)?)
    }

    /// Decode a roster from MessagePack bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Decode`] if deserialisation fails.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(Self {
            slots: rmp_serde::from_slice(bytes)?,
        })
    }

    /// Write the roster snapshot to a file.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if encoding or the write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Read a roster snapshot from a file.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the read or decoding fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

impl<E: Entity> Default for SavedRoster<E> {
    fn default() -> Self {
        Self::new()
    }
}
