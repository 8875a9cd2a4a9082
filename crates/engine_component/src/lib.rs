//! # engine_component
//!
//! The "C" in ECS. Defines what a component is, where an entity keeps its
//! components, and which component indices the registry marks as relative
//! to a parent.
//!
//! This crate provides:
//!
//! - [`Entity`]: lightweight `u64` entity identifiers.
//! - [`EntityAllocator`]: monotonically increasing ID allocator.
//! - [`Component`] / [`ErasedComponent`]: the typed and type-erased
//!   component contracts.
//! - [`ParentRelative`]: the capability of components recomputed from
//!   their parent's value.
//! - [`ComponentSlots`]: per-entity storage indexed by [`ComponentIndex`].
//! - [`ComponentRegistry`]: index → type name map plus the relative set.

pub mod component;
pub mod entity;
pub mod error;
pub mod registry;
pub mod slots;

pub use component::{Component, ComponentIndex, ErasedComponent, ParentRelative};
pub use entity::{Entity, EntityAllocator};
pub use error::ComponentError;
pub use registry::ComponentRegistry;
pub use slots::ComponentSlots;
