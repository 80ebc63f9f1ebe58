//! # tickwork_world
//!
//! In-process collaborators for the schedulers in `tickwork_core`:
//!
//! - [`World`] — entity lifecycle and typed component storage, implementing
//!   [`EntityStore`](tickwork_core::EntityStore).
//! - [`EventQueue`] — deferred, typed event broadcast, implementing
//!   [`EventSink`](tickwork_core::EventSink).

pub mod events;
pub mod world;

pub use events::EventQueue;
pub use world::{World, WorldError};
