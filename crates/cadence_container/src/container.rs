//! The manager container — lazy registry, run ledger, and phase scheduling.
//!
//! Managers are constructed on first lookup and kept in an arena in
//! first-seen order. Each phase pass walks the arena, running every
//! manager's dependency chain ahead of the manager itself, with a per-pass
//! ledger recording which managers have already been reached through a
//! chain.
//!
//! Two behaviors of the walk are deliberate and load-bearing for
//! conformance (see the module tests):
//!
//! - The walk stops at the first already-run link of a chain and does not
//!   re-check anything further up.
//! - Only managers reached *through a chain* are marked run. A manager
//!   invoked directly from arena order is not marked, so it can be invoked
//!   a second time in the same pass as a later manager's dependency.

use std::any::Any;
use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use cadence_entity::{Manager, ManagerTypeId, Phase};

use crate::report::{ContainerReport, ManagerReport};

/// One arena slot: a manager instance plus the identity the registry and
/// ledger key it by.
struct ManagerEntry {
    tag: ManagerTypeId,
    name: &'static str,
    manager: Box<dyn Manager>,
}

/// The per-process home of every entity manager.
///
/// The container is the only writer of its own registry and ledger; manager
/// hooks never reach back into it. All phase invocation happens sequentially
/// on the caller's thread.
pub struct Container {
    /// Unique identity for this container, for log correlation.
    instance_id: String,
    /// Managers in first-registration order.
    entries: Vec<ManagerEntry>,
    /// Type tag → arena index.
    index: HashMap<ManagerTypeId, usize>,
    /// Per-pass "has this manager run" ledger. Reset at the start of every
    /// phase pass.
    ledger: HashMap<ManagerTypeId, bool>,
}

impl Container {
    /// Create an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
            entries: Vec::new(),
            index: HashMap::new(),
            ledger: HashMap::new(),
        }
    }

    /// Returns this container's unique instance id.
    #[must_use]
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Returns the number of registered managers.
    #[must_use]
    pub fn manager_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if a manager of type `T` has been constructed.
    #[must_use]
    pub fn is_registered<T: Manager>(&self) -> bool {
        self.index.contains_key(&T::manager_type_id())
    }

    /// Look up the manager of type `T`, constructing it on first request.
    ///
    /// On a miss the manager is default-constructed, inserted into the arena
    /// (preserving first-seen order) and the ledger, and receives
    /// `handle_init` exactly once. On a hit the existing instance is
    /// returned unchanged.
    pub fn get_manager<T: Manager + Default>(&mut self) -> &mut T {
        let tag = T::manager_type_id();
        if !self.index.contains_key(&tag) {
            let arena_index = self.entries.len();
            self.entries.push(ManagerEntry {
                tag,
                name: T::type_name(),
                manager: Box::new(T::default()),
            });
            self.index.insert(tag, arena_index);
            self.ledger.insert(tag, false);
            self.entries[arena_index].manager.handle_init();
            debug!(
                container = self.instance_id,
                manager = T::type_name(),
                "constructed manager"
            );
        }

        let arena_index = self.index[&tag];
        let manager: &mut dyn Any = self.entries[arena_index].manager.as_mut();
        manager
            .downcast_mut::<T>()
            .expect("manager type tag resolved to a different concrete type")
    }

    /// Run one phase pass over all managers.
    ///
    /// Resets the ledger, then visits managers in first-registration order.
    /// A manager already marked run is skipped. Otherwise its dependency
    /// chain is walked first: each link that has not run is invoked and
    /// marked, and the walk advances to that link's own dependency; the walk
    /// stops at the first link already marked run, or at a tag with no
    /// registered manager. The manager itself is then invoked without being
    /// marked.
    pub fn run_phase(&mut self, phase: Phase) {
        for flag in self.ledger.values_mut() {
            *flag = false;
        }

        debug!(
            container = self.instance_id,
            phase = %phase,
            managers = self.entries.len(),
            "phase pass"
        );

        for i in 0..self.entries.len() {
            let tag = self.entries[i].tag;
            if self.has_run(tag) {
                continue;
            }

            let mut next = self.entries[i].manager.dependency();
            while let Some(dep_tag) = next {
                if self.has_run(dep_tag) {
                    break;
                }
                let Some(&dep_index) = self.index.get(&dep_tag) else {
                    break;
                };
                phase.invoke(self.entries[dep_index].manager.as_mut());
                self.ledger.insert(dep_tag, true);
                next = self.entries[dep_index].manager.dependency();
            }

            phase.invoke(self.entries[i].manager.as_mut());
        }
    }

    /// Init pass. Triggered once by the owning process at startup.
    pub fn startup(&mut self) {
        debug!(container = self.instance_id, "container startup");
        self.run_phase(Phase::Init);
    }

    /// Physics-update pass, once per simulation step.
    pub fn physics_update(&mut self) {
        self.run_phase(Phase::PhysicsUpdate);
    }

    /// Update pass, once per frame.
    pub fn update(&mut self) {
        self.run_phase(Phase::Update);
    }

    /// Late-update pass, once per frame after [`Container::update`].
    pub fn late_update(&mut self) {
        self.run_phase(Phase::LateUpdate);
    }

    /// Destroy pass. Triggered once by the owning process at shutdown;
    /// managers release resources and clear their rosters.
    pub fn shutdown(&mut self) {
        debug!(container = self.instance_id, "container shutdown");
        self.run_phase(Phase::Destroy);
    }

    /// Read-only diagnostic listing of every manager in registration order.
    #[must_use]
    pub fn report(&self) -> ContainerReport {
        ContainerReport {
            managers: self
                .entries
                .iter()
                .map(|entry| ManagerReport {
                    name: entry.name.to_string(),
                    entity_count: entry.manager.entity_count(),
                })
                .collect(),
        }
    }

    fn has_run(&self, tag: ManagerTypeId) -> bool {
        self.ledger.get(&tag).copied().unwrap_or(false)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("instance_id", &self.instance_id)
            .field("managers", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use cadence_entity::{Entity, Roster, SlotIndex};

    use super::*;

    #[test]
    fn test_lazy_lookup_is_idempotent() {
        static INITS: AtomicUsize = AtomicUsize::new(0);

        #[derive(Default)]
        struct Counting {
            value: u32,
        }

        impl Manager for Counting {
            fn type_name() -> &'static str {
                "test.Counting"
            }

            fn entity_count(&self) -> usize {
                0
            }

            fn handle_init(&mut self) {
                INITS.fetch_add(1, Ordering::SeqCst);
            }

            fn clear_entities(&mut self) {}
        }

        let mut container = Container::new();
        container.get_manager::<Counting>().value = 7;
        let again = container.get_manager::<Counting>();
        assert_eq!(again.value, 7, "second lookup must return the same instance");
        assert_eq!(INITS.load(Ordering::SeqCst), 1, "init fires once, not per lookup");
        assert_eq!(container.manager_count(), 1);
    }

    #[test]
    fn test_chain_runs_before_dependent() {
        static LOG: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

        #[derive(Default)]
        struct A;
        #[derive(Default)]
        struct B;
        #[derive(Default)]
        struct C;

        impl Manager for A {
            fn type_name() -> &'static str {
                "chain.A"
            }
            fn entity_count(&self) -> usize {
                0
            }
            fn dependency(&self) -> Option<ManagerTypeId> {
                Some(B::manager_type_id())
            }
            fn handle_update(&mut self) {
                LOG.lock().unwrap().push("A");
            }
            fn clear_entities(&mut self) {}
        }

        impl Manager for B {
            fn type_name() -> &'static str {
                "chain.B"
            }
            fn entity_count(&self) -> usize {
                0
            }
            fn dependency(&self) -> Option<ManagerTypeId> {
                Some(C::manager_type_id())
            }
            fn handle_update(&mut self) {
                LOG.lock().unwrap().push("B");
            }
            fn clear_entities(&mut self) {}
        }

        impl Manager for C {
            fn type_name() -> &'static str {
                "chain.C"
            }
            fn entity_count(&self) -> usize {
                0
            }
            fn handle_update(&mut self) {
                LOG.lock().unwrap().push("C");
            }
            fn clear_entities(&mut self) {}
        }

        let mut container = Container::new();
        container.get_manager::<A>();
        container.get_manager::<B>();
        container.get_manager::<C>();

        container.update();

        // The walk invokes each chain link as it discovers it, so the whole
        // chain precedes the dependent and each link runs exactly once; B and
        // C are then skipped when arena order reaches them.
        assert_eq!(*LOG.lock().unwrap(), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_ledger_resets_between_passes() {
        static LOG: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

        #[derive(Default)]
        struct Lead;
        #[derive(Default)]
        struct Base;

        impl Manager for Lead {
            fn type_name() -> &'static str {
                "reset.Lead"
            }
            fn entity_count(&self) -> usize {
                0
            }
            fn dependency(&self) -> Option<ManagerTypeId> {
                Some(Base::manager_type_id())
            }
            fn handle_update(&mut self) {
                LOG.lock().unwrap().push("Lead");
            }
            fn clear_entities(&mut self) {}
        }

        impl Manager for Base {
            fn type_name() -> &'static str {
                "reset.Base"
            }
            fn entity_count(&self) -> usize {
                0
            }
            fn handle_update(&mut self) {
                LOG.lock().unwrap().push("Base");
            }
            fn clear_entities(&mut self) {}
        }

        let mut container = Container::new();
        container.get_manager::<Lead>();
        container.get_manager::<Base>();

        container.update();
        container.update();

        assert_eq!(
            *LOG.lock().unwrap(),
            vec!["Base", "Lead", "Base", "Lead"],
            "a fresh pass must re-run managers satisfied in the previous pass"
        );
    }

    #[test]
    fn test_walk_stops_at_satisfied_link() {
        static LOG: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

        #[derive(Default)]
        struct X;
        #[derive(Default)]
        struct A;
        #[derive(Default)]
        struct B;
        #[derive(Default)]
        struct C;

        impl Manager for X {
            fn type_name() -> &'static str {
                "shortcut.X"
            }
            fn entity_count(&self) -> usize {
                0
            }
            fn dependency(&self) -> Option<ManagerTypeId> {
                Some(B::manager_type_id())
            }
            fn handle_update(&mut self) {
                LOG.lock().unwrap().push("X");
            }
            fn clear_entities(&mut self) {}
        }

        impl Manager for A {
            fn type_name() -> &'static str {
                "shortcut.A"
            }
            fn entity_count(&self) -> usize {
                0
            }
            fn dependency(&self) -> Option<ManagerTypeId> {
                Some(B::manager_type_id())
            }
            fn handle_update(&mut self) {
                LOG.lock().unwrap().push("A");
            }
            fn clear_entities(&mut self) {}
        }

        impl Manager for B {
            fn type_name() -> &'static str {
                "shortcut.B"
            }
            fn entity_count(&self) -> usize {
                0
            }
            fn dependency(&self) -> Option<ManagerTypeId> {
                Some(C::manager_type_id())
            }
            fn handle_update(&mut self) {
                LOG.lock().unwrap().push("B");
            }
            fn clear_entities(&mut self) {}
        }

        impl Manager for C {
            fn type_name() -> &'static str {
                "shortcut.C"
            }
            fn entity_count(&self) -> usize {
                0
            }
            fn handle_update(&mut self) {
                LOG.lock().unwrap().push("C");
            }
            fn clear_entities(&mut self) {}
        }

        let mut container = Container::new();
        container.get_manager::<X>();
        container.get_manager::<A>();
        container.get_manager::<B>();
        container.get_manager::<C>();

        container.update();

        // X's walk runs and marks B then C. A's walk finds B already
        // satisfied and stops there — expected behavior, not a bug: the walk
        // never re-checks further up a satisfied chain.
        assert_eq!(*LOG.lock().unwrap(), vec!["B", "C", "X", "A"]);
    }

    #[test]
    fn test_direct_run_is_not_marked() {
        static LOG: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

        #[derive(Default)]
        struct B;
        #[derive(Default)]
        struct A;

        impl Manager for B {
            fn type_name() -> &'static str {
                "double.B"
            }
            fn entity_count(&self) -> usize {
                0
            }
            fn handle_update(&mut self) {
                LOG.lock().unwrap().push("B");
            }
            fn clear_entities(&mut self) {}
        }

        impl Manager for A {
            fn type_name() -> &'static str {
                "double.A"
            }
            fn entity_count(&self) -> usize {
                0
            }
            fn dependency(&self) -> Option<ManagerTypeId> {
                Some(B::manager_type_id())
            }
            fn handle_update(&mut self) {
                LOG.lock().unwrap().push("A");
            }
            fn clear_entities(&mut self) {}
        }

        let mut container = Container::new();
        container.get_manager::<B>();
        container.get_manager::<A>();

        container.update();

        // B runs directly (unmarked), then again as A's dependency —
        // current behavior, preserved and documented rather than deduplicated.
        assert_eq!(*LOG.lock().unwrap(), vec!["B", "B", "A"]);
    }

    #[test]
    fn test_unregistered_dependency_stops_walk() {
        static LOG: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

        #[derive(Default)]
        struct Orphan;

        impl Manager for Orphan {
            fn type_name() -> &'static str {
                "orphan.A"
            }
            fn entity_count(&self) -> usize {
                0
            }
            fn dependency(&self) -> Option<ManagerTypeId> {
                Some(ManagerTypeId::from_name("orphan.NeverRegistered"))
            }
            fn handle_update(&mut self) {
                LOG.lock().unwrap().push("Orphan");
            }
            fn clear_entities(&mut self) {}
        }

        let mut container = Container::new();
        container.get_manager::<Orphan>();
        container.update();

        assert_eq!(*LOG.lock().unwrap(), vec!["Orphan"]);
    }

    #[test]
    fn test_dependency_cycle_terminates() {
        static LOG: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

        #[derive(Default)]
        struct A;
        #[derive(Default)]
        struct B;

        impl Manager for A {
            fn type_name() -> &'static str {
                "cycle.A"
            }
            fn entity_count(&self) -> usize {
                0
            }
            fn dependency(&self) -> Option<ManagerTypeId> {
                Some(B::manager_type_id())
            }
            fn handle_update(&mut self) {
                LOG.lock().unwrap().push("A");
            }
            fn clear_entities(&mut self) {}
        }

        impl Manager for B {
            fn type_name() -> &'static str {
                "cycle.B"
            }
            fn entity_count(&self) -> usize {
                0
            }
            fn dependency(&self) -> Option<ManagerTypeId> {
                Some(A::manager_type_id())
            }
            fn handle_update(&mut self) {
                LOG.lock().unwrap().push("B");
            }
            fn clear_entities(&mut self) {}
        }

        let mut container = Container::new();
        container.get_manager::<A>();
        container.get_manager::<B>();

        // Marks accumulate as the walk advances, so a cycle mis-orders but
        // never hangs: A's walk runs B, then A itself, then stops at B.
        container.update();
        assert_eq!(*LOG.lock().unwrap(), vec!["B", "A", "A"]);
    }

    #[test]
    fn test_update_scenario_preserves_counts() {
        static LOG: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

        #[derive(Debug)]
        struct Probe {
            slot: SlotIndex,
        }

        impl Probe {
            fn new() -> Self {
                Self {
                    slot: SlotIndex::UNASSIGNED,
                }
            }
        }

        impl Entity for Probe {
            fn slot(&self) -> SlotIndex {
                self.slot
            }
            fn assign_slot(&mut self, slot: SlotIndex) {
                self.slot = slot;
            }
        }

        #[derive(Default)]
        struct X {
            roster: Roster<Probe>,
        }
        #[derive(Default)]
        struct Y {
            roster: Roster<Probe>,
        }

        impl Manager for X {
            fn type_name() -> &'static str {
                "scenario.X"
            }
            fn entity_count(&self) -> usize {
                self.roster.entity_count()
            }
            fn handle_update(&mut self) {
                LOG.lock().unwrap().push("X");
            }
            fn clear_entities(&mut self) {
                self.roster.clear();
            }
        }

        impl Manager for Y {
            fn type_name() -> &'static str {
                "scenario.Y"
            }
            fn entity_count(&self) -> usize {
                self.roster.entity_count()
            }
            fn dependency(&self) -> Option<ManagerTypeId> {
                Some(X::manager_type_id())
            }
            fn handle_update(&mut self) {
                LOG.lock().unwrap().push("Y");
            }
            fn clear_entities(&mut self) {
                self.roster.clear();
            }
        }

        let mut container = Container::new();
        {
            let y = container.get_manager::<Y>();
            y.roster.register(Probe::new());
        }
        {
            let x = container.get_manager::<X>();
            x.roster.register(Probe::new());
            x.roster.register(Probe::new());
            x.roster.register(Probe::new());
        }

        container.update();

        // X runs first as Y's dependency, Y follows, and X is skipped when
        // arena order reaches it directly.
        assert_eq!(*LOG.lock().unwrap(), vec!["X", "Y"]);
        assert_eq!(container.get_manager::<X>().entity_count(), 3);
        assert_eq!(container.get_manager::<Y>().entity_count(), 1);
    }

    #[test]
    fn test_startup_pass_reaches_existing_managers() {
        static INITS: AtomicUsize = AtomicUsize::new(0);

        #[derive(Default)]
        struct Eager;

        impl Manager for Eager {
            fn type_name() -> &'static str {
                "startup.Eager"
            }
            fn entity_count(&self) -> usize {
                0
            }
            fn handle_init(&mut self) {
                INITS.fetch_add(1, Ordering::SeqCst);
            }
            fn clear_entities(&mut self) {}
        }

        let mut container = Container::new();
        container.get_manager::<Eager>();
        container.startup();

        // Once at construction, once from the init pass.
        assert_eq!(INITS.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_shutdown_clears_entities_and_tolerates_prior_release() {
        static DISPOSALS: AtomicUsize = AtomicUsize::new(0);

        #[derive(Debug)]
        struct Probe {
            slot: SlotIndex,
        }

        impl Entity for Probe {
            fn slot(&self) -> SlotIndex {
                self.slot
            }
            fn assign_slot(&mut self, slot: SlotIndex) {
                self.slot = slot;
            }
        }

        #[derive(Default)]
        struct Holder {
            roster: Roster<Probe>,
        }

        impl Manager for Holder {
            fn type_name() -> &'static str {
                "teardown.Holder"
            }
            fn entity_count(&self) -> usize {
                self.roster.entity_count()
            }
            fn dispose_all(&mut self) {
                DISPOSALS.fetch_add(1, Ordering::SeqCst);
            }
            fn clear_entities(&mut self) {
                self.roster.clear();
            }
        }

        let mut container = Container::new();
        container.get_manager::<Holder>().roster.register(Probe {
            slot: SlotIndex::UNASSIGNED,
        });

        // Simulate an update-phase cleanup having already released resources.
        container.get_manager::<Holder>().dispose_all();
        container.shutdown();

        assert_eq!(DISPOSALS.load(Ordering::SeqCst), 2, "double release is a no-op");
        assert_eq!(container.get_manager::<Holder>().entity_count(), 0);
    }

    #[test]
    fn test_report_lists_managers_in_registration_order() {
        #[derive(Default)]
        struct First;
        #[derive(Default)]
        struct Second;

        impl Manager for First {
            fn type_name() -> &'static str {
                "report.First"
            }
            fn entity_count(&self) -> usize {
                0
            }
            fn clear_entities(&mut self) {}
        }

        impl Manager for Second {
            fn type_name() -> &'static str {
                "report.Second"
            }
            fn entity_count(&self) -> usize {
                0
            }
            fn clear_entities(&mut self) {}
        }

        let mut container = Container::new();
        container.get_manager::<First>();
        container.get_manager::<Second>();

        let report = container.report();
        let names: Vec<&str> = report.managers.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["report.First", "report.Second"]);
    }
}
