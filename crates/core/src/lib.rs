//! `vidbench-core`: domain model and pure logic for the video workbench.
//!
//! Nothing in this crate performs I/O or spawns tasks. The session crate
//! drives these functions from its action queue and timers.

pub mod actions;
pub mod entities;
pub mod error;
pub mod library;
pub mod progress;
pub mod readiness;
pub mod reducer;
pub mod types;
pub mod versioning;
pub mod workbench;
