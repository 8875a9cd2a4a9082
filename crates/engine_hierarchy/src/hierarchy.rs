//! # Parent/Child Links
//!
//! Hierarchy operations on [`World`]. A link has two sides that must always
//! agree: the child's `parent` field and the parent's [`ChildSet`]. Only
//! [`World::add_child`] and [`World::reparent`] create links. Each calls the
//! other, and idempotence on both sides ends the mutual call:
//!
//! ```text
//! add_child(P, C) ── insert C into P.children ──► reparent(C, P)
//!                                                   │ unparent(C) from old parent
//!                                                   │ C.parent = P
//!                                                   │ track P's relative components (+ sync)
//!                                                   │ subscribe C's cascade to P's destroy
//!                                                   └─► add_child(P, C)   // already present: no-op
//! ```
//!
//! [`World::remove_child`] and [`World::unparent`] are the inverse pair and
//! recurse into each other the same way.
//!
//! ## Destroyed entities
//!
//! A parent that is being destroyed no longer calls back into the children
//! it removes; their side of the link is severed by their own destroy
//! cascade. An entity that is already destroyed cannot be adopted: asking a
//! child to reparent onto it destroys the child instead.
//!
//! [`ChildSet`]: crate::ChildSet

use engine_component::{Component, ComponentIndex, Entity};
use tracing::{debug, trace, warn};

use crate::event::{ComponentListener, DestroyListener};
use crate::node::EntityNode;
use crate::world::World;

impl World {
    /// Make `child` a child of `parent`.
    ///
    /// If `child` was already linked elsewhere it is unlinked first. A no-op
    /// if `parent` already has this child, if either entity is not live, or
    /// if the link would make `child` its own ancestor.
    ///
    /// # Panics
    ///
    /// In debug builds, if a sibling already uses `name` (case-insensitively).
    pub fn add_child(&mut self, parent: Entity, child: Entity, name: Option<&str>) {
        if !self.is_alive(parent) || !self.is_alive(child) {
            trace!(%parent, %child, "add_child on a dead entity ignored");
            return;
        }
        if self.creates_cycle(parent, child) {
            warn!(%parent, %child, "refusing to add an ancestor as a child");
            return;
        }
        let Some(node) = self.entities.get_mut(&parent) else {
            return;
        };
        if !node.children.insert(child, name) {
            return;
        }
        debug!(%parent, %child, name, "child added");

        self.reparent(child, parent);
    }

    /// Remove `child` from `parent`'s children.
    ///
    /// Returns `false` if it was not a child. Unless `parent` is being
    /// destroyed, the child's own side of the link is severed too.
    pub fn remove_child(&mut self, parent: Entity, child: Entity) -> bool {
        let Some(node) = self.entities.get_mut(&parent) else {
            return false;
        };
        if node.children.remove(child).is_none() {
            return false;
        }
        let parent_destroyed = node.destroyed;
        trace!(%parent, %child, parent_destroyed, "child removed");

        if !parent_destroyed {
            let linked = self
                .entities
                .get(&child)
                .is_some_and(|node| node.parent == Some(parent));
            if linked {
                self.unparent(child);
            }
        }
        true
    }

    /// Remove the child `parent` knows under `name` (case-insensitively).
    ///
    /// Returns `false` if no child has that name.
    pub fn remove_child_by_name(&mut self, parent: Entity, name: &str) -> bool {
        let Some(child) = self
            .entities
            .get(&parent)
            .and_then(|node| node.children.id_by_name(name))
        else {
            return false;
        };
        self.remove_child(parent, child)
    }

    /// Link `child` under `parent`.
    ///
    /// - No-op if `parent` is already the parent, or if `child` is not live.
    /// - If `parent` is not live, `child` is destroyed and no link is made.
    /// - Otherwise `child` leaves its current parent, then tracks each of
    ///   `parent`'s relative components that it also has (recomputing from
    ///   the parent's current value immediately), subscribes to `parent`'s
    ///   destruction, and is added to `parent`'s children.
    ///
    /// Listeners that run during the attach-time sync may move, unlink, or
    /// destroy either entity. The nested operation then wins and this call
    /// stops where it is.
    pub fn reparent(&mut self, child: Entity, parent: Entity) {
        let Some(node) = self.entities.get(&child) else {
            return;
        };
        if node.destroyed || node.parent == Some(parent) {
            return;
        }
        if !self.is_alive(parent) {
            debug!(%child, %parent, "new parent is not alive, destroying child");
            self.destroy(child);
            return;
        }
        if self.creates_cycle(parent, child) {
            warn!(%child, %parent, "refusing to reparent an entity under itself");
            return;
        }

        self.unparent(child);
        if let Some(node) = self.entities.get_mut(&child) {
            node.parent = Some(parent);
        }
        debug!(%child, %parent, "reparenting");

        let relative: Vec<ComponentIndex> = self
            .registry
            .relative_components()
            .filter(|&index| self.has_component(child, index))
            .collect();
        for index in relative {
            self.track_parent_component(child, parent, index);
            if self.attach_interrupted(child, parent) {
                return;
            }
        }

        let id = self.next_subscription_id();
        if let Some(parent_node) = self.entities.get_mut(&parent) {
            parent_node
                .on_destroyed
                .subscribe(id, DestroyListener::Cascade(child));
        }
        if let Some(node) = self.entities.get_mut(&child) {
            node.parent_link.on_destroyed = Some(id);
        }

        self.add_child(parent, child, None);
    }

    /// Sever `child` from its parent, if it has one.
    ///
    /// Subscriptions on the parent are removed before the parent's child set
    /// is touched, so no parent notification can reach a half-unlinked child.
    pub fn unparent(&mut self, child: Entity) {
        let Some(node) = self.entities.get_mut(&child) else {
            return;
        };
        let link = std::mem::take(&mut node.parent_link);
        let Some(parent) = node.parent else {
            return;
        };

        if let Some(parent_node) = self.entities.get_mut(&parent) {
            for (index, id) in link.components {
                parent_node.tracked.untrack(index, id);
            }
            if let Some(id) = link.on_destroyed {
                parent_node.on_destroyed.unsubscribe(id);
            }
        }

        self.remove_child(parent, child);

        // `remove_child` may already have re-entered and cleared the link.
        if let Some(node) = self.entities.get_mut(&child)
            && node.parent.take().is_some()
        {
            debug!(%child, %parent, "unparented");
        }
    }

    /// The parent of `child`, if `child` is live and linked.
    #[must_use]
    pub fn parent(&self, child: Entity) -> Option<Entity> {
        self.try_get_entity(child)?.parent()
    }

    /// Child ids of `parent`, ascending. Empty if `parent` is not live.
    #[must_use]
    pub fn children(&self, parent: Entity) -> &[Entity] {
        self.try_get_entity(parent)
            .map(EntityNode::children)
            .unwrap_or(&[])
    }

    /// Resolve `parent`'s child named `name` (case-insensitively).
    ///
    /// `None` if the name is unknown or the child is no longer live.
    #[must_use]
    pub fn try_fetch_child(&self, parent: Entity, name: &str) -> Option<&EntityNode> {
        let child = self.try_get_entity(parent)?.children.id_by_name(name)?;
        self.try_get_entity(child)
    }

    /// The first live child of `parent` that has a `T`.
    ///
    /// A linear scan over the children; no per-component index is kept.
    #[must_use]
    pub fn try_fetch_child_with_component<T: Component>(&self, parent: Entity) -> Option<&EntityNode> {
        self.children(parent)
            .iter()
            .filter_map(|&child| self.try_get_entity(child))
            .find(|node| node.has_component(T::INDEX))
    }

    /// Subscribe `child` to `parent`'s component at `index` and sync it.
    ///
    /// Returns `true` if the parent had the component and the child was
    /// recomputed from it.
    pub(crate) fn track_parent_component(
        &mut self,
        child: Entity,
        parent: Entity,
        index: ComponentIndex,
    ) -> bool {
        let id = self.next_subscription_id();
        let Some(parent_node) = self.entities.get_mut(&parent) else {
            return false;
        };
        parent_node
            .tracked
            .track(index, id, ComponentListener::ParentModified(child));
        if let Some(node) = self.entities.get_mut(&child) {
            node.parent_link.components.push((index, id));
        }
        trace!(%child, %parent, %index, "tracking parent component");

        self.sync_from_parent(child, parent, index)
    }

    /// Drop `child`'s subscription on its parent's component at `index`.
    pub(crate) fn untrack_parent_component(&mut self, child: Entity, index: ComponentIndex) {
        let Some(node) = self.entities.get_mut(&child) else {
            return;
        };
        let Some(parent) = node.parent else {
            return;
        };
        let Some(pos) = node
            .parent_link
            .components
            .iter()
            .position(|(tracked, _)| *tracked == index)
        else {
            return;
        };
        let (_, id) = node.parent_link.components.swap_remove(pos);
        if let Some(parent_node) = self.entities.get_mut(&parent) {
            parent_node.tracked.untrack(index, id);
        }
        trace!(%child, %parent, %index, "stopped tracking parent component");
    }

    /// Check a link in progress after sync listeners have run.
    ///
    /// Returns `true` if the listeners took the link over: the child was
    /// destroyed, moved, or unlinked, or the parent died. A child whose new
    /// parent died mid-attach is destroyed unless it was moved elsewhere.
    fn attach_interrupted(&mut self, child: Entity, parent: Entity) -> bool {
        let Some(current) = self.try_get_entity(child).map(EntityNode::parent) else {
            return true;
        };
        if !self.is_alive(parent) {
            if current.is_none_or(|current| current == parent) {
                debug!(%child, %parent, "parent destroyed during attach, destroying child");
                self.unparent(child);
                self.destroy(child);
            }
            return true;
        }
        if current != Some(parent) {
            debug!(%child, %parent, ?current, "attach superseded by a listener");
            return true;
        }
        false
    }

    /// Returns `true` if linking `child` under `parent` would close a loop.
    fn creates_cycle(&self, parent: Entity, child: Entity) -> bool {
        if !self.config.prevent_cycles {
            return false;
        }
        let mut cursor = Some(parent);
        while let Some(entity) = cursor {
            if entity == child {
                return true;
            }
            cursor = self.entities.get(&entity).and_then(|node| node.parent);
        }
        false
    }
}
