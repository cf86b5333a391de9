//! Distance visibility scaling.
//!
//! Inflates distant objects so they remain visible at ranges a real
//! observer could spot them, compensating for limited display resolution.
//! Uses the Serfoss smart-scaling curve: scale grows linearly with range
//! with a small square-root correction for field of view.
//!
//! Each update schedules the scale computation as a parallel batch over the
//! roster; the following late-update joins the batch and writes the scales
//! back. Depends on the floating-origin manager so distances are measured
//! from recentred positions.

use cadence_entity::{Entity, Manager, ManagerTypeId, Roster, SlotIndex};
use cadence_jobs::{JobBatch, JobPool};
use cadence_math::Vec3;

use crate::SharedTransform;
use crate::floating_origin::FloatingOriginManager;

/// Serfoss resolution factor — linear growth per downsampled range unit.
pub const SERFOSS_RESOLUTION_FACTOR: f32 = 0.09226;

/// Serfoss field-of-view factor — square-root correction term.
pub const SERFOSS_FOV_FACTOR: f32 = 0.00148;

/// Range is divided by this before the curve is applied.
pub const SERFOSS_RANGE_DOWNSAMPLE: f32 = 1000.0;

/// Meters to feet ratio; the curve was fitted in feet.
pub const METERS_TO_FEET: f32 = 3.280_839_9;

const WORKER_COUNT: usize = 4;
const CHUNK_SIZE: usize = 64;

/// Additional uniform scale for an object at the given range, in metres.
#[must_use]
pub fn serfoss_scale_amount(distance_m: f32) -> f32 {
    let distance = distance_m * METERS_TO_FEET / SERFOSS_RANGE_DOWNSAMPLE;
    SERFOSS_RESOLUTION_FACTOR * distance - SERFOSS_FOV_FACTOR * distance.sqrt()
}

/// An object scaled up with distance from the viewer.
#[derive(Debug)]
pub struct VisibilityEntity {
    slot: SlotIndex,
    transform: SharedTransform,
    enabled: bool,
}

impl VisibilityEntity {
    /// Create an enabled entity around a shared transform.
    #[must_use]
    pub fn new(transform: SharedTransform) -> Self {
        Self {
            slot: SlotIndex::UNASSIGNED,
            transform,
            enabled: true,
        }
    }

    /// Disabled entities keep whatever scale they currently have.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns `true` if this entity participates in scaling.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Entity for VisibilityEntity {
    fn slot(&self) -> SlotIndex {
        self.slot
    }

    fn assign_slot(&mut self, slot: SlotIndex) {
        self.slot = slot;
    }
}

/// Per-entity input captured at update time for the scale batch.
struct ScaleRow {
    position: Vec3,
    original_scale: Vec3,
    enabled: bool,
}

/// Scales registered objects with distance from the viewer.
#[derive(Default)]
pub struct VisibilityManager {
    roster: Roster<VisibilityEntity>,
    /// Each entity's scale as it was at registration, by slot.
    original_scales: Vec<Vec3>,
    viewer: Option<SharedTransform>,
    pool: Option<JobPool>,
    inflight: Option<JobBatch<Option<Vec3>>>,
}

impl VisibilityManager {
    /// Register an entity, capturing its current scale as the baseline the
    /// curve inflates from.
    pub fn register(&mut self, entity: VisibilityEntity) -> SlotIndex {
        let original_scale = entity
            .transform
            .lock()
            .map(|t| t.scale)
            .unwrap_or(Vec3::ONE);
        let slot = self.roster.register(entity);
        self.original_scales.push(original_scale);
        slot
    }

    /// Set the transform distances are measured from.
    pub fn set_viewer(&mut self, viewer: SharedTransform) {
        self.viewer = Some(viewer);
    }

    /// Toggle scaling for a registered entity.
    pub fn set_enabled(&mut self, slot: SlotIndex, enabled: bool) {
        if let Some(entity) = self.roster.get_mut(slot) {
            entity.set_enabled(enabled);
        }
    }
}

impl Manager for VisibilityManager {
    fn type_name() -> &'static str {
        "VisibilityManager"
    }

    fn entity_count(&self) -> usize {
        self.roster.entity_count()
    }

    fn dependency(&self) -> Option<ManagerTypeId> {
        // Distances must be measured after any origin recentre this pass.
        Some(FloatingOriginManager::manager_type_id())
    }

    fn handle_init(&mut self) {
        self.pool.get_or_insert_with(|| JobPool::new(WORKER_COUNT));
    }

    fn handle_update(&mut self) {
        let Some(pool) = &self.pool else {
            return;
        };
        let Some(viewer) = &self.viewer else {
            return;
        };
        let Ok(viewer_position) = viewer.lock().map(|t| t.position) else {
            return;
        };

        let original_scales = &self.original_scales;
        let mut rows = Vec::with_capacity(self.roster.entity_count());
        self.roster.for_each(|slot, entity| {
            let Ok(transform) = entity.transform.lock() else {
                return;
            };
            rows.push(ScaleRow {
                position: transform.position,
                original_scale: original_scales
                    .get(slot.index())
                    .copied()
                    .unwrap_or(Vec3::ONE),
                enabled: entity.enabled,
            });
        });

        self.inflight = Some(pool.scatter(rows, CHUNK_SIZE, move |row| {
            if !row.enabled {
                return None;
            }
            let distance = row.position.distance(viewer_position);
            Some(row.original_scale + Vec3::splat(serfoss_scale_amount(distance)))
        }));
    }

    fn handle_late_update(&mut self) {
        let Some(mut batch) = self.inflight.take() else {
            return;
        };
        let Some(scales) = batch.complete() else {
            return;
        };

        self.roster.for_each(|slot, entity| {
            if let Some(Some(scale)) = scales.get(slot.index())
                && let Ok(mut transform) = entity.transform.lock()
            {
                transform.scale = *scale;
            }
        });
    }

    fn dispose_all(&mut self) {
        // A late update may already have joined the batch.
        if let Some(mut batch) = self.inflight.take() {
            batch.complete();
        }
        if let Some(mut pool) = self.pool.take() {
            pool.shutdown();
        }
    }

    fn clear_entities(&mut self) {
        self.roster.clear();
        self.original_scales.clear();
    }
}
