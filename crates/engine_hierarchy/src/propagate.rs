//! Delivery of parent component changes to relative children.
//!
//! A child subscribes to its parent's component at every relative index it
//! also carries. When the parent's value changes, the child's own component
//! recomputes itself through [`ParentRelative`], and the child's listeners
//! for that index are notified in turn. Grandchildren follow in the same
//! call stack.
//!
//! [`ParentRelative`]: engine_component::ParentRelative

use engine_component::{ComponentIndex, Entity, ErasedComponent};
use tracing::{error, trace};

use crate::world::World;

impl World {
    /// Recompute `child`'s component at `index` from `parent`'s current value.
    ///
    /// Returns `false` if `parent` has no component at `index`.
    pub(crate) fn sync_from_parent(
        &mut self,
        child: Entity,
        parent: Entity,
        index: ComponentIndex,
    ) -> bool {
        let Some(value) = self
            .entities
            .get(&parent)
            .and_then(|node| node.components.get(index))
            .map(|value| value.clone_erased())
        else {
            return false;
        };
        self.on_parent_modified(child, index, &*value);
        true
    }

    /// Handle a change to the parent's component at `index`.
    ///
    /// # Panics
    ///
    /// In debug builds, if `value` does not belong to `index` or the child's
    /// component lacks the parent-relative capability. Release builds log the
    /// violation and skip the recompute.
    pub(crate) fn on_parent_modified(
        &mut self,
        child: Entity,
        index: ComponentIndex,
        value: &dyn ErasedComponent,
    ) {
        debug_assert_eq!(value.index(), index, "notification index mismatch");

        let Some(node) = self.entities.get_mut(&child) else {
            return;
        };
        let Some(component) = node.components.get_mut(index) else {
            trace!(%child, %index, "child no longer has the component");
            return;
        };
        let name = component.type_name();
        let Some(relative) = component.as_parent_relative() else {
            if cfg!(debug_assertions) {
                panic!("component `{name}` at {index} is registered relative but is not ParentRelative");
            }
            error!(%child, %index, name, "relative component cannot recompute from parent");
            return;
        };
        relative.recompute_from_parent(value, child);
        trace!(%child, %index, "recomputed from parent");

        self.notify(child, index);
    }
}
