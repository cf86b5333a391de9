//! # cadence_entity
//!
//! The contracts at the bottom of the cadence scheduler — defines what an
//! entity is, how a manager stores its entities, and the lifecycle surface
//! every manager exposes to the container.
//!
//! This crate provides:
//!
//! - [`Entity`] trait and [`SlotIndex`] — stable slot identity for registrable items.
//! - [`Roster`] — insertion-ordered in-memory entity storage.
//! - [`SavedRoster`] — the persisted flavor, tolerant of vacated slots and
//!   serialisable to MessagePack snapshots.
//! - [`Manager`] trait and [`ManagerTypeId`] — the lifecycle contract and the
//!   stable type tag the container keys its registry by.
//! - [`Phase`] — the five lifecycle phases a container sweeps through.

pub mod manager;
pub mod phase;
pub mod roster;
pub mod saved;
pub mod slot;

pub use manager::{Manager, ManagerTypeId};
pub use phase::Phase;
pub use roster::Roster;
pub use saved::{SavedRoster, SnapshotError};
pub use slot::{Entity, SlotIndex};
