//! The manager lifecycle contract and its stable type tag.
//!
//! A manager owns a homogeneous collection of entities and exposes a fixed
//! set of lifecycle hooks the container drives once per phase pass. Every
//! hook is optional except teardown bookkeeping; a manager with zero
//! entities must tolerate every hook.
//!
//! ## Type identity
//!
//! The container keys its registry by [`ManagerTypeId`], a 64-bit tag derived
//! from the manager's **string name** with the FNV-1a hash. The tag replaces
//! runtime type lookups: dependency edges are declared as tags, never as
//! live manager references, so querying a dependency can have no side
//! effects.

use std::any::Any;

use serde::{Deserialize, Serialize};

/// A unique identifier for a manager type, derived from its declared name
/// using the FNV-1a 64-bit hash algorithm.
///
/// The tag is deterministic: the same name always hashes to the same id, so
/// dependency edges can be declared before the prerequisite manager exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ManagerTypeId(pub u64);

impl ManagerTypeId {
    /// FNV-1a 64-bit offset basis.
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

    /// FNV-1a 64-bit prime.
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    /// Compute the [`ManagerTypeId`] for a manager's declared name.
    ///
    /// # Algorithm (FNV-1a 64-bit)
    ///
    /// ```text
    /// hash = 0xcbf29ce484222325          (offset basis)
    /// for each byte in name.as_bytes():
    ///     hash = hash XOR byte
    ///     hash = hash * 0x00000100000001b3  (prime)
    /// return hash
    /// ```
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// Compute the [`ManagerTypeId`] for a Rust manager type `M`.
    #[must_use]
    pub fn of<M: Manager>() -> Self {
        ManagerTypeId::from_name(M::type_name())
    }
}

/// The lifecycle contract every manager implements.
///
/// Managers are constructed lazily by the container on first lookup
/// (`Default` is required at the lookup site, not here, so the trait stays
/// object-safe). Hooks default to no-ops; a concrete manager overrides the
/// ones it needs.
///
/// Hooks may read or mutate the external state of every owned entity, but
/// must not register or remove entities while a hook iterates the roster.
pub trait Manager: Any {
    /// The declared name of this manager type, hashed into its
    /// [`ManagerTypeId`]. Names must be unique across the process.
    fn type_name() -> &'static str
    where
        Self: Sized;

    /// Returns the stable type tag for this manager type.
    #[must_use]
    fn manager_type_id() -> ManagerTypeId
    where
        Self: Sized,
    {
        ManagerTypeId::from_name(Self::type_name())
    }

    /// Returns the number of entities this manager currently owns.
    fn entity_count(&self) -> usize;

    /// The type tag of the single manager that must run before this one,
    /// or `None`. Read-only: querying the dependency never constructs it.
    fn dependency(&self) -> Option<ManagerTypeId> {
        None
    }

    /// Called once when the manager is constructed, and again on the
    /// container's init pass.
    fn handle_init(&mut self) {}

    /// Called once per physics step.
    fn handle_physics_update(&mut self) {}

    /// Called once per frame.
    fn handle_update(&mut self) {}

    /// Called once per frame, after every manager's update.
    fn handle_late_update(&mut self) {}

    /// Called once at teardown: releases scheduler-external resources, then
    /// clears the entity collection.
    ///
    /// Must be idempotent-safe — resources already released by an earlier
    /// update-phase cleanup are a no-op, not an error.
    fn handle_destroy(&mut self) {
        self.dispose_all();
        self.clear_entities();
    }

    /// Release any scheduler-external resources (job pools, scratch
    /// buffers). Tolerates being called when nothing is held.
    fn dispose_all(&mut self) {}

    /// Remove every entity from the roster. Implemented by every manager;
    /// invoked by the default [`Manager::handle_destroy`].
    fn clear_entities(&mut self);
}
