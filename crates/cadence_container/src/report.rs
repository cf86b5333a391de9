//! Read-only container diagnostics.
//!
//! A [`ContainerReport`] is a pure query: it lists each registered manager's
//! type name and current entity count, in registration order, for logging or
//! an external inspection surface. Producing it never mutates the container.

use serde::{Deserialize, Serialize};

/// One manager's diagnostic row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerReport {
    /// The manager's declared type name.
    pub name: String,
    /// The number of entities the manager currently owns.
    pub entity_count: usize,
}

/// Snapshot of every registered manager, in registration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerReport {
    /// One row per manager.
    pub managers: Vec<ManagerReport>,
}

impl std::fmt::Display for ContainerReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for manager in &self.managers {
            writeln!(f, "{} - {} entities", manager.name, manager.entity_count)?;
        }
        Ok(())
    }
}
