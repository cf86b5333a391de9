//! Floating-origin recentring.
//!
//! Watches a target transform (typically the viewer) and, when any axis of
//! its position exceeds the threshold, shifts every registered transform by
//! the negated overflow so the world recentres around the target. The shift
//! batch is scheduled and completed within the same update call; nothing
//! carries over into the next phase.

use tracing::debug;

use cadence_entity::{Entity, Manager, Roster, SlotIndex};
use cadence_jobs::JobPool;
use cadence_math::Vec3;

use crate::SharedTransform;

/// Default recentre threshold, in world units per axis.
pub const DEFAULT_THRESHOLD: f32 = 1024.0;

const WORKER_COUNT: usize = 4;
const CHUNK_SIZE: usize = 64;

/// An object whose world-space transform follows origin shifts.
#[derive(Debug)]
pub struct OriginEntity {
    slot: SlotIndex,
    transform: SharedTransform,
}

impl OriginEntity {
    /// Create an entity around a shared transform.
    #[must_use]
    pub fn new(transform: SharedTransform) -> Self {
        Self {
            slot: SlotIndex::UNASSIGNED,
            transform,
        }
    }
}

impl Entity for OriginEntity {
    fn slot(&self) -> SlotIndex {
        self.slot
    }

    fn assign_slot(&mut self, slot: SlotIndex) {
        self.slot = slot;
    }
}

/// Shifts registered transforms around a moving target.
pub struct FloatingOriginManager {
    roster: Roster<OriginEntity>,
    pool: Option<JobPool>,
    target: Option<SharedTransform>,
    /// Per-axis distance the target may stray before a recentre.
    pub threshold: f32,
    offset: Vec3,
    shifted_this_frame: bool,
    listeners: Vec<Box<dyn FnMut(Vec3) + Send>>,
}

impl Default for FloatingOriginManager {
    fn default() -> Self {
        Self {
            roster: Roster::new(),
            pool: None,
            target: None,
            threshold: DEFAULT_THRESHOLD,
            offset: Vec3::ZERO,
            shifted_this_frame: false,
            listeners: Vec::new(),
        }
    }
}

impl FloatingOriginManager {
    /// Register an entity to be moved with the origin.
    pub fn register(&mut self, entity: OriginEntity) -> SlotIndex {
        self.roster.register(entity)
    }

    /// Set the transform whose position drives recentring.
    ///
    /// The target is watched, not moved — register it as an entity as well
    /// if it should follow the shift (it almost always should).
    pub fn set_target(&mut self, target: SharedTransform) {
        self.target = Some(target);
    }

    /// Subscribe to origin shifts; the listener receives each shift vector.
    pub fn on_shift(&mut self, listener: impl FnMut(Vec3) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Total offset applied across all shifts so far.
    #[must_use]
    pub fn current_offset(&self) -> Vec3 {
        self.offset
    }

    /// `true` from the update pass that shifted until the next one that
    /// does not.
    #[must_use]
    pub fn has_shifted_this_frame(&self) -> bool {
        self.shifted_this_frame
    }

    fn pending_shift(&self) -> Vec3 {
        let Some(target) = &self.target else {
            return Vec3::ZERO;
        };
        let Ok(transform) = target.lock() else {
            return Vec3::ZERO;
        };

        let position = transform.position;
        let mut shift = Vec3::ZERO;
        if position.x.abs() > self.threshold {
            shift.x = position.x;
        }
        if position.y.abs() > self.threshold {
            shift.y = position.y;
        }
        if position.z.abs() > self.threshold {
            shift.z = position.z;
        }
        shift
    }
}

impl Manager for FloatingOriginManager {
    fn type_name() -> &'static str {
        "FloatingOriginManager"
    }

    fn entity_count(&self) -> usize {
        self.roster.entity_count()
    }

    fn handle_init(&mut self) {
        self.pool.get_or_insert_with(|| JobPool::new(WORKER_COUNT));
    }

    fn handle_update(&mut self) {
        let shift = self.pending_shift();
        if shift == Vec3::ZERO {
            self.shifted_this_frame = false;
            return;
        }

        self.shifted_this_frame = true;
        self.offset += shift;

        if let Some(pool) = &self.pool {
            let mut transforms: Vec<SharedTransform> = Vec::with_capacity(self.roster.entity_count());
            self.roster
                .for_each(|_, entity| transforms.push(entity.transform.clone()));

            // Scheduled and joined inside this call: the recentred positions
            // must be visible to every manager that runs after us this pass.
            let mut batch = pool.scatter(transforms, CHUNK_SIZE, move |transform| {
                if let Ok(mut t) = transform.lock() {
                    t.position -= shift;
                }
            });
            batch.complete();
        }

        debug!(?shift, offset = ?self.offset, "origin recentred");

        for listener in &mut self.listeners {
            listener(shift);
        }
    }

    fn dispose_all(&mut self) {
        if let Some(mut pool) = self.pool.take() {
            pool.shutdown();
        }
    }

    fn clear_entities(&mut self) {
        self.roster.clear();
    }
}
