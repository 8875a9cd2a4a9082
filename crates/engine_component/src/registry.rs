//! Component registry: which indices exist and which are parent-relative.
//!
//! The indices themselves are assigned by the build-time generator; this
//! registry is the runtime view of its output. The world consults it to
//! reject unknown components and to decide, on every link, which component
//! indices a child must subscribe to on its parent.

use std::collections::{BTreeMap, BTreeSet};

use crate::component::{Component, ComponentIndex, ParentRelative};
use crate::error::ComponentError;

/// Registry of component types known to a world.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    /// Type names keyed by slot index.
    names: BTreeMap<ComponentIndex, &'static str>,
    /// Indices whose components are recomputed from the parent.
    relative: BTreeSet<ComponentIndex>,
}

impl ComponentRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component type at its [`Component::INDEX`].
    ///
    /// Registering the same type twice is a no-op. A different type at an
    /// index that is already taken is rejected.
    pub fn register<T: Component>(&mut self) -> Result<(), ComponentError> {
        match self.names.get(&T::INDEX) {
            Some(&existing) if existing != T::NAME => Err(ComponentError::IndexTaken {
                index: T::INDEX,
                existing,
                requested: T::NAME,
            }),
            Some(_) => Ok(()),
            None => {
                self.names.insert(T::INDEX, T::NAME);
                Ok(())
            }
        }
    }

    /// Register a component type and add its index to the relative set.
    ///
    /// The `ParentRelative` bound guarantees at compile time that the type has
    /// the capability; its [`Component::as_parent_relative`] override is still
    /// what the hierarchy calls at runtime.
    pub fn register_relative<T: Component + ParentRelative>(
        &mut self,
    ) -> Result<(), ComponentError> {
        self.register::<T>()?;
        self.relative.insert(T::INDEX);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<T: Component>(mut self) -> Result<Self, ComponentError> {
        self.register::<T>()?;
        Ok(self)
    }

    /// Builder-style [`register_relative`](Self::register_relative).
    pub fn with_relative<T: Component + ParentRelative>(mut self) -> Result<Self, ComponentError> {
        self.register_relative::<T>()?;
        Ok(self)
    }

    /// Returns `true` if some type is registered at `index`.
    #[must_use]
    pub fn contains(&self, index: ComponentIndex) -> bool {
        self.names.contains_key(&index)
    }

    /// Returns the type name registered at `index`.
    #[must_use]
    pub fn name(&self, index: ComponentIndex) -> Option<&'static str> {
        self.names.get(&index).copied()
    }

    /// Returns `true` if `index` is in the relative set.
    #[must_use]
    pub fn is_relative(&self, index: ComponentIndex) -> bool {
        self.relative.contains(&index)
    }

    /// Iterate the relative set in ascending index order.
    pub fn relative_components(&self) -> impl Iterator<Item = ComponentIndex> + '_ {
        self.relative.iter().copied()
    }

    /// Returns the number of registered component types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ErasedComponent;
    use crate::entity::Entity;

    #[derive(Debug, Clone)]
    struct Health;

    impl Component for Health {
        const INDEX: ComponentIndex = ComponentIndex(0);
        const NAME: &'static str = "Health";
    }

    #[derive(Debug, Clone)]
    struct Mana;

    impl Component for Mana {
        const INDEX: ComponentIndex = ComponentIndex(0);
        const NAME: &'static str = "Mana";
    }

    #[derive(Debug, Clone)]
    struct Offset;

    impl Component for Offset {
        const INDEX: ComponentIndex = ComponentIndex(3);
        const NAME: &'static str = "Offset";

        fn as_parent_relative(&mut self) -> Option<&mut dyn ParentRelative> {
            Some(self)
        }
    }

    impl ParentRelative for Offset {
        fn recompute_from_parent(&mut self, _parent: &dyn ErasedComponent, _owner: Entity) {}
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ComponentRegistry::new().with::<Health>().unwrap();
        assert!(registry.contains(ComponentIndex(0)));
        assert_eq!(registry.name(ComponentIndex(0)), Some("Health"));
        assert!(!registry.is_relative(ComponentIndex(0)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_same_type_twice_is_idempotent() {
        let mut registry = ComponentRegistry::new();
        registry.register::<Health>().unwrap();
        registry.register::<Health>().unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_index_collision_rejected() {
        let mut registry = ComponentRegistry::new();
        registry.register::<Health>().unwrap();
        let err = registry.register::<Mana>().unwrap_err();
        assert!(matches!(
            err,
            ComponentError::IndexTaken { existing: "Health", requested: "Mana", .. }
        ));
        assert_eq!(registry.name(ComponentIndex(0)), Some("Health"));
    }

    #[test]
    fn test_relative_set() {
        let registry = ComponentRegistry::new()
            .with::<Health>()
            .unwrap()
            .with_relative::<Offset>()
            .unwrap();
        assert!(registry.is_relative(ComponentIndex(3)));
        assert_eq!(
            registry.relative_components().collect::<Vec<_>>(),
            vec![ComponentIndex(3)]
        );
    }
}
