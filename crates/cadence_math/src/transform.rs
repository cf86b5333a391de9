//! World-space transform.
//!
//! [`WorldTransform`] is the external per-entity state the demo managers
//! mutate: a world-space position and a scale. Origin-shift managers
//! translate the position; visibility managers rewrite the scale.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Position and scale of an object in world space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WorldTransform {
    /// World-space position.
    pub position: Vec3,
    /// Per-axis scale factor.
    pub scale: Vec3,
}

impl WorldTransform {
    /// The identity transform: origin, unit scale.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    /// Create a transform at the given position with unit scale.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Create a transform with position and scale.
    #[must_use]
    pub fn from_position_scale(position: Vec3, scale: Vec3) -> Self {
        Self { position, scale }
    }

    /// Translate the transform by the given offset.
    #[must_use]
    pub fn translated(mut self, offset: Vec3) -> Self {
        self.position += offset;
        self
    }

    /// Distance from this transform's position to a point.
    #[must_use]
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.position.distance(point)
    }
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
