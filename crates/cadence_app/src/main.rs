//! # cadence_app — container host
//!
//! Owns the process's container and drives its lifecycle: one init pass at
//! startup, then physics-update / update / late-update per frame at a fixed
//! rate, and a destroy pass at shutdown.
//!
//! Frame pacing is configurable through the environment:
//!
//! - `CADENCE_FRAME_RATE` — target frames per second (default 60).
//! - `CADENCE_MAX_FRAMES` — frames to run before exiting (default 0,
//!   meaning run indefinitely).

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cadence_container::{Container, FrameConfig, FrameLoop};

/// The environment variable overriding the target frame rate.
const FRAME_RATE_ENV: &str = "CADENCE_FRAME_RATE";

/// The environment variable overriding the frame budget.
const MAX_FRAMES_ENV: &str = "CADENCE_MAX_FRAMES";

fn env_config() -> FrameConfig {
    let defaults = FrameConfig::default();
    FrameConfig {
        frame_rate: std::env::var(FRAME_RATE_ENV)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.frame_rate),
        max_frames: std::env::var(MAX_FRAMES_ENV)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.max_frames),
    }
}

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("cadence_app=info".parse()?))
        .init();

    info!("cadence container host starting");

    let config = env_config();
    let mut frames = FrameLoop::new(Container::new(), config);
    frames.run();

    println!("{}", serde_json::to_string_pretty(&frames.container().report())?);

    info!("cadence container host shut down");
    Ok(())
}
