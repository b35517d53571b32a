//! `vidbench-session` library crate.
//!
//! Hosts the async runtime pieces around `vidbench-core`: configuration,
//! the event bus, the upload simulator and the session that serialises
//! every state mutation. The binary entrypoint lives in `main.rs`.

pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod seed;
pub mod session;
pub mod simulator;

pub use error::SessionError;
pub use events::{EventBus, WorkbenchEvent};
pub use session::Session;
