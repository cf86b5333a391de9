//! # cadence_container
//!
//! The container is the per-process home of every entity manager. It owns
//! manager construction, phase scheduling, and the dependency walk that
//! keeps prerequisite managers running first.
//!
//! This crate provides:
//!
//! - [`Container`] — lazy manager registry, run ledger, and the phase-pass
//!   dependency walk.
//! - [`ContainerSlot`] — explicit ownership of the active container;
//!   replaces a process-global with a handle the owning process holds.
//! - [`FrameLoop`] / [`FrameConfig`] — fixed-rate frame driver invoking the
//!   phase triggers in lifecycle order.
//! - [`ContainerReport`] — read-only diagnostic listing of registered
//!   managers and their entity counts.

pub mod container;
pub mod frame;
pub mod report;
pub mod slot;

pub use container::Container;
pub use frame::{FrameConfig, FrameLoop};
pub use report::{ContainerReport, ManagerReport};
pub use slot::ContainerSlot;
