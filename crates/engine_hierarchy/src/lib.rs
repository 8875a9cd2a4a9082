//! # engine_hierarchy
//!
//! Parent/child links between entities, and the change notifications that
//! keep parent-relative components in step with their parents.
//!
//! Everything lives in a [`World`], which owns each entity's
//! [`EntityNode`]. Entities refer to one another only by
//! [`Entity`](engine_component::Entity) id. Hierarchy operations are
//! methods on the world:
//!
//! - [`World::add_child`] / [`World::reparent`] link a child under a parent.
//! - [`World::remove_child`] / [`World::unparent`] sever a link.
//! - [`World::destroy`] cascades to every linked descendant.
//!
//! When a child is linked, it subscribes to each of its parent's components
//! whose index the registry marks as relative. Any change to one of those
//! components is delivered synchronously to the child, which recomputes its
//! own value through [`ParentRelative`](engine_component::ParentRelative).
//!
//! ```
//! use engine_component::{Component, ComponentIndex, ComponentRegistry, Entity, ErasedComponent, ParentRelative};
//! use engine_hierarchy::World;
//!
//! #[derive(Debug, Clone)]
//! struct Depth {
//!     local: u32,
//!     total: u32,
//! }
//!
//! impl Component for Depth {
//!     const INDEX: ComponentIndex = ComponentIndex(1);
//!     const NAME: &'static str = "Depth";
//!
//!     fn as_parent_relative(&mut self) -> Option<&mut dyn ParentRelative> {
//!         Some(self)
//!     }
//! }
//!
//! impl ParentRelative for Depth {
//!     fn recompute_from_parent(&mut self, parent: &dyn ErasedComponent, _owner: Entity) {
//!         if let Some(parent) = parent.downcast_ref::<Depth>() {
//!             self.total = parent.total + self.local;
//!         }
//!     }
//! }
//!
//! let registry = ComponentRegistry::new().with_relative::<Depth>().unwrap();
//! let mut world = World::new(registry);
//!
//! let root = world.spawn();
//! let arm = world.spawn();
//! world.insert(root, Depth { local: 1, total: 1 }).unwrap();
//! world.insert(arm, Depth { local: 1, total: 1 }).unwrap();
//!
//! world.add_child(root, arm, Some("arm"));
//! assert_eq!(world.get::<Depth>(arm).unwrap().total, 2);
//! assert_eq!(world.try_fetch_child(root, "ARM").map(|node| node.id()), Some(arm));
//!
//! world.destroy(root);
//! assert!(!world.is_alive(arm));
//! ```

pub mod children;
pub mod config;
pub mod error;
pub mod event;
pub mod hierarchy;
pub mod node;
pub mod propagate;
pub mod world;

#[cfg(test)]
mod testing;

pub use children::ChildSet;
pub use config::WorldConfig;
pub use error::WorldError;
pub use event::{
    ComponentCallback, ComponentListener, ComponentNotifications, DestroyCallback, DestroyListener, Multicast,
    SubscriptionId,
};
pub use node::EntityNode;
pub use world::World;
