//! Flight scene — a full container lifecycle over the demo managers.
//!
//! Registers the visibility manager *before* the origin manager it depends
//! on, spawns a formation of craft, then flies the viewer outward so the
//! origin recentres several times while distant craft scale up. The
//! container's dependency walk keeps the origin shift ahead of the scale
//! pass every frame.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cadence_container::{Container, ContainerSlot};
use cadence_math::{Vec3, WorldTransform};
use demo_managers::{
    FloatingOriginManager, OriginEntity, SharedTransform, VisibilityEntity, VisibilityManager,
};

/// Number of craft in the formation.
const CRAFT_COUNT: usize = 12;

/// Frames to simulate.
const FRAME_COUNT: u64 = 240;

/// Viewer speed in world units per frame.
const VIEWER_SPEED: f32 = 40.0;

fn shared(position: Vec3) -> SharedTransform {
    Arc::new(Mutex::new(WorldTransform::from_position(position)))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("flight_scene=info".parse()?))
        .init();

    info!("flight scene starting");

    let mut slot = ContainerSlot::new();
    let container = slot.install(Container::new());

    // Visibility first: its execution order behind the origin manager must
    // come from the dependency walk, not from registration order.
    container.get_manager::<VisibilityManager>();
    container.get_manager::<FloatingOriginManager>();

    let viewer = shared(Vec3::ZERO);
    {
        let origin = container.get_manager::<FloatingOriginManager>();
        origin.set_target(viewer.clone());
        origin.register(OriginEntity::new(viewer.clone()));
        origin.on_shift(|shift| info!(?shift, "origin recentred"));
    }

    for i in 0..CRAFT_COUNT {
        let position = Vec3::new(800.0 * i as f32, 150.0, 500.0 + 90.0 * i as f32);
        let craft = shared(position);

        container
            .get_manager::<FloatingOriginManager>()
            .register(OriginEntity::new(craft.clone()));
        container
            .get_manager::<VisibilityManager>()
            .register(VisibilityEntity::new(craft));
    }

    container
        .get_manager::<VisibilityManager>()
        .set_viewer(viewer.clone());

    container.startup();

    for _ in 0..FRAME_COUNT {
        if let Ok(mut transform) = viewer.lock() {
            transform.position.x += VIEWER_SPEED;
        }

        container.physics_update();
        container.update();
        container.late_update();
    }

    let offset = container
        .get_manager::<FloatingOriginManager>()
        .current_offset();
    info!(frames = FRAME_COUNT, ?offset, "flight complete");

    println!("{}", serde_json::to_string_pretty(&container.report())?);

    container.shutdown();
    info!("flight scene shut down");
    Ok(())
}
