//! # tickwork_entity
//!
//! The vocabulary the schedulers share with whatever entity store drives them.
//!
//! This crate provides:
//!
//! - [`Entity`] — opaque `u64` handles. Stores decide how they are minted.
//! - [`Component`] — marker trait for data attached to an entity.
//! - [`ComponentTypeId`] — stable identity of a component kind.

pub mod component;
pub mod entity;

pub use component::{Component, ComponentTypeId};
pub use entity::Entity;
