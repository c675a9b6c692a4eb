//! # engine_entity
//!
//! The entity store at the centre of the simulation runtime.
//!
//! This crate provides:
//!
//! - [`EntityId`]: monotonically allocated, never-reused entity ids.
//! - [`Entity`]: an id plus its components.
//! - [`ComponentValue`] / [`ComponentKind`]: the closed set of component
//!   kinds, with typed access through the [`Component`] trait.
//! - [`EntityStore`]: owner of all live entities with id, tag, and group
//!   indices.

pub mod component;
pub mod entity;
pub mod sprite;
pub mod store;

pub use component::{
    Component, ComponentKind, ComponentValue, Position, UnknownComponentKind, Velocity,
};
pub use entity::{Entity, EntityId, EntityIdAllocator};
pub use sprite::{Animation, Sprite};
pub use store::EntityStore;
