//! Concrete entity managers built on the cadence contract.
//!
//! Two managers that mirror a common flight-sim pairing:
//!
//! - [`FloatingOriginManager`] recentres the world around a moving target so
//!   coordinates stay small.
//! - [`VisibilityManager`] inflates distant objects so they stay visible at
//!   ranges a real observer could spot them; it depends on the origin
//!   manager so distances are measured after any recentring.
//!
//! Both fan per-entity work out to a [`cadence_jobs::JobPool`] inside a
//! single frame's phase sequence.

pub mod floating_origin;
pub mod visibility;

pub use floating_origin::{FloatingOriginManager, OriginEntity};
pub use visibility::{VisibilityEntity, VisibilityManager};

use std::sync::{Arc, Mutex};

use cadence_math::WorldTransform;

/// A transform shared between the scene and the managers that move it.
pub type SharedTransform = Arc<Mutex<WorldTransform>>;

/// Convenience constructor for a [`SharedTransform`].
#[must_use]
pub fn shared_transform(transform: WorldTransform) -> SharedTransform {
    Arc::new(Mutex::new(transform))
}
