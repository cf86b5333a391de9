//! Lifecycle phases.
//!
//! A container sweeps all managers once per phase trigger: init at startup,
//! then physics-update / update / late-update every frame, and destroy at
//! shutdown.

use crate::manager::Manager;

/// One lifecycle phase of a container pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Startup, once per container lifetime.
    Init,
    /// Fixed-rate simulation step.
    PhysicsUpdate,
    /// Per-frame update.
    Update,
    /// Per-frame update, after every manager's [`Phase::Update`].
    LateUpdate,
    /// Shutdown, once per container lifetime.
    Destroy,
}

impl Phase {
    /// Invoke the hook this phase corresponds to on a manager.
    pub fn invoke(self, manager: &mut dyn Manager) {
        match self {
            Phase::Init => manager.handle_init(),
            Phase::PhysicsUpdate => manager.handle_physics_update(),
            Phase::Update => manager.handle_update(),
            Phase::LateUpdate => manager.handle_late_update(),
            Phase::Destroy => manager.handle_destroy(),
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Init => "init",
            Phase::PhysicsUpdate => "physics-update",
            Phase::Update => "update",
            Phase::LateUpdate => "late-update",
            Phase::Destroy => "destroy",
        };
        f.write_str(name)
    }
}
