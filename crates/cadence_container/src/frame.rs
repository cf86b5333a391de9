//! Frame loop driving a container through its lifecycle.
//!
//! Implements the fixed-rate frame lifecycle at the process/scheduler
//! boundary:
//!
//! 1. `startup` — one init pass.
//! 2. Per frame: physics-update, update, late-update passes, in that order.
//! 3. `shutdown` — one destroy pass.
//!
//! The loop blocks the calling thread; all phase work happens sequentially
//! on it.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::container::Container;

/// Configuration for the frame loop.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Target frames per second.
    pub frame_rate: f64,
    /// Maximum number of frames to run (0 = unlimited).
    pub max_frames: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            max_frames: 0,
        }
    }
}

/// Drives a [`Container`] through startup, paced frames, and shutdown.
#[derive(Debug)]
pub struct FrameLoop {
    /// Current frame counter.
    frame_id: u64,
    /// Frame configuration.
    config: FrameConfig,
    /// The container being driven.
    container: Container,
}

impl FrameLoop {
    /// Create a frame loop around a container.
    #[must_use]
    pub fn new(container: Container, config: FrameConfig) -> Self {
        Self {
            frame_id: 0,
            config,
            container,
        }
    }

    /// Returns the current frame counter.
    #[must_use]
    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    /// Returns a reference to the container.
    #[must_use]
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Returns a mutable reference to the container, e.g. to register
    /// managers and entities before running.
    pub fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    /// Run one frame: physics-update, update, late-update.
    pub fn step(&mut self) {
        self.frame_id += 1;

        debug!(frame_id = self.frame_id, "frame start");

        self.container.physics_update();
        self.container.update();
        self.container.late_update();
    }

    /// Run the full lifecycle: startup, the configured number of frames (or
    /// indefinitely), then shutdown.
    pub fn run(&mut self) {
        let frame_duration = Duration::from_secs_f64(1.0 / self.config.frame_rate);
        let mut frame_count = 0u64;

        info!(
            frame_rate = self.config.frame_rate,
            max_frames = self.config.max_frames,
            "starting frame loop"
        );

        self.container.startup();

        loop {
            let start = Instant::now();

            self.step();

            frame_count += 1;
            if self.config.max_frames > 0 && frame_count >= self.config.max_frames {
                info!(frames = frame_count, "frame loop complete");
                break;
            }

            let elapsed = start.elapsed();
            if elapsed < frame_duration {
                std::thread::sleep(frame_duration - elapsed);
            } else {
                warn!(
                    frame_id = self.frame_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = frame_duration.as_millis() as u64,
                    "frame exceeded time budget"
                );
            }
        }

        self.container.shutdown();
    }
}
