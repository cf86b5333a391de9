//! # cadence_jobs
//!
//! A small worker-thread pool for the per-frame fan-out pattern: a manager
//! schedules parallel per-entity work during its update hook and joins it
//! before the frame's phase sequence ends.
//!
//! This crate provides:
//!
//! - [`JobPool`] — fixed worker threads fed over channels; idempotent
//!   shutdown.
//! - [`JobHandle`] — a single background computation joined with
//!   [`JobHandle::complete`].
//! - [`JobBatch`] — a parallel map over an owned input, reassembled in
//!   input order on completion.
//!
//! Completion is tolerant: joining a handle twice, or joining after the
//! worker died, yields `None` rather than an error. Managers hit this
//! "already released" case whenever a late-update cleanup and a destroy
//! pass both try to release the same work.

pub mod handle;
pub mod pool;

pub use handle::{JobBatch, JobHandle};
pub use pool::JobPool;
