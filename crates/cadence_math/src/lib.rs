//! # cadence_math
//!
//! Math types for the cadence scheduler. Re-exports [`glam`] for linear
//! algebra and defines the spatial type managers read and write on their
//! entities.

pub mod transform;

// Re-export glam types for convenience.
pub use glam::{Vec2, Vec3, Vec4};

pub use transform::WorldTransform;
