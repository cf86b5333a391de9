//! Explicit ownership of the active container.
//!
//! Processes hold a [`ContainerSlot`] instead of reaching for a global:
//! whoever owns the slot owns the active container and its lifecycle.
//! Installing a container while another is active is tolerated — the newest
//! one wins — but reported, since it usually means two scenes each believe
//! they own the entity system.

use tracing::warn;

use crate::container::Container;

/// Holds the process's active [`Container`], if any.
#[derive(Debug, Default)]
pub struct ContainerSlot {
    active: Option<Container>,
}

impl ContainerSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self { active: None }
    }

    /// Install a container, making it the active one.
    ///
    /// If a container is already active a warning is logged and the newest
    /// instance replaces it; the previous container is dropped.
    pub fn install(&mut self, container: Container) -> &mut Container {
        if let Some(previous) = &self.active {
            warn!(
                previous = previous.instance_id(),
                replacement = container.instance_id(),
                "two containers detected, only the newest will be used"
            );
        }
        self.active.insert(container)
    }

    /// Returns the active container, if one is installed.
    #[must_use]
    pub fn active(&self) -> Option<&Container> {
        self.active.as_ref()
    }

    /// Returns the active container mutably, if one is installed.
    pub fn active_mut(&mut self) -> Option<&mut Container> {
        self.active.as_mut()
    }

    /// Returns `true` if a container is installed.
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.active.is_some()
    }

    /// Remove and return the active container, leaving the slot empty.
    pub fn retire(&mut self) -> Option<Container> {
        self.active.take()
    }
}
