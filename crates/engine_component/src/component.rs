//! Core [`Component`] trait, its type-erased counterpart, and the
//! [`ParentRelative`] capability.
//!
//! ## Component indices
//!
//! Every component type occupies a fixed [`ComponentIndex`] assigned ahead of
//! time by the registry generator. Entities store components in slots keyed
//! by that index, and change notifications are routed by it, so two
//! different types must never share an index within one
//! [`ComponentRegistry`](crate::ComponentRegistry).
//!
//! ## Typed vs. erased
//!
//! [`Component`] carries the index and name as associated constants, which
//! makes it unusable as a trait object. [`ErasedComponent`] is the
//! object-safe view, implemented for every `Component` by a blanket impl.
//! Storage and notification dispatch work with `dyn ErasedComponent`;
//! typed accessors downcast through [`ErasedComponent::as_any`].

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// The stable slot index of a component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentIndex(pub u16);

impl ComponentIndex {
    /// Returns the index as a `usize`, for slot addressing.
    #[must_use]
    pub const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ComponentIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The core component trait.
///
/// # Examples
///
/// ```rust
/// use engine_component::{Component, ComponentIndex};
///
/// #[derive(Debug, Clone)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     const INDEX: ComponentIndex = ComponentIndex(4);
///     const NAME: &'static str = "Health";
/// }
/// ```
pub trait Component: Any + Clone + fmt::Debug {
    /// The slot index assigned to this type by the registry.
    const INDEX: ComponentIndex;

    /// A human-readable name, used in logs and registry lookups.
    const NAME: &'static str;

    /// Capability query for parent-relative recomputation.
    ///
    /// Types implementing [`ParentRelative`] override this to return
    /// `Some(self)`; every other type keeps the default.
    fn as_parent_relative(&mut self) -> Option<&mut dyn ParentRelative> {
        None
    }
}

/// Object-safe view of a [`Component`].
pub trait ErasedComponent: Any + fmt::Debug + 'static {
    /// The slot index of the concrete type.
    fn index(&self) -> ComponentIndex;

    /// The name of the concrete type.
    fn type_name(&self) -> &'static str;

    /// Clone into a new box.
    fn clone_erased(&self) -> Box<dyn ErasedComponent>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// See [`Component::as_parent_relative`].
    fn as_parent_relative(&mut self) -> Option<&mut dyn ParentRelative>;
}

impl<T: Component> ErasedComponent for T {
    fn index(&self) -> ComponentIndex {
        T::INDEX
    }

    fn type_name(&self) -> &'static str {
        T::NAME
    }

    fn clone_erased(&self) -> Box<dyn ErasedComponent> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_parent_relative(&mut self) -> Option<&mut dyn ParentRelative> {
        Component::as_parent_relative(self)
    }
}

impl dyn ErasedComponent {
    /// Downcast to a concrete component type.
    #[must_use]
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutable downcast to a concrete component type.
    #[must_use]
    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// A component whose value is derived from the same-indexed component of the
/// owning entity's parent.
///
/// The hierarchy calls [`recompute_from_parent`](Self::recompute_from_parent)
/// once when the link is made (if the parent already has the component) and
/// again every time the parent's component changes. How the parent value is
/// combined with local state is entirely up to the implementing type.
pub trait ParentRelative {
    /// Recompute this component from the parent's current value.
    ///
    /// `owner` is the entity this component belongs to.
    fn recompute_from_parent(&mut self, parent: &dyn ErasedComponent, owner: Entity);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Health {
        current: f32,
    }

    impl Component for Health {
        const INDEX: ComponentIndex = ComponentIndex(1);
        const NAME: &'static str = "Health";
    }

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Depth {
        local: u32,
        total: u32,
    }

    impl Component for Depth {
        const INDEX: ComponentIndex = ComponentIndex(2);
        const NAME: &'static str = "Depth";

        fn as_parent_relative(&mut self) -> Option<&mut dyn ParentRelative> {
            Some(self)
        }
    }

    impl ParentRelative for Depth {
        fn recompute_from_parent(&mut self, parent: &dyn ErasedComponent, _owner: Entity) {
            if let Some(parent) = parent.downcast_ref::<Depth>() {
                self.total = parent.total + self.local;
            }
        }
    }

    #[test]
    fn test_erased_reports_type_constants() {
        let boxed: Box<dyn ErasedComponent> = Box::new(Health { current: 3.0 });
        assert_eq!(boxed.index(), ComponentIndex(1));
        assert_eq!(boxed.type_name(), "Health");
    }

    #[test]
    fn test_downcast() {
        let boxed: Box<dyn ErasedComponent> = Box::new(Health { current: 3.0 });
        assert_eq!(boxed.downcast_ref::<Health>(), Some(&Health { current: 3.0 }));
        assert!(boxed.downcast_ref::<Depth>().is_none());
    }

    #[test]
    fn test_clone_erased_is_independent() {
        let mut boxed: Box<dyn ErasedComponent> = Box::new(Health { current: 3.0 });
        let copy = boxed.clone_erased();
        boxed.downcast_mut::<Health>().unwrap().current = 9.0;
        assert_eq!(copy.downcast_ref::<Health>().unwrap().current, 3.0);
    }

    #[test]
    fn test_capability_query() {
        let mut health: Box<dyn ErasedComponent> = Box::new(Health { current: 1.0 });
        assert!(health.as_parent_relative().is_none());

        let mut depth: Box<dyn ErasedComponent> = Box::new(Depth { local: 2, total: 0 });
        let parent = Depth { local: 1, total: 5 };
        depth
            .as_parent_relative()
            .unwrap()
            .recompute_from_parent(&parent, Entity::from_raw(1));
        assert_eq!(depth.downcast_ref::<Depth>().unwrap().total, 7);
    }

    #[test]
    fn test_index_display() {
        assert_eq!(ComponentIndex(3).to_string(), "#3");
    }
}
