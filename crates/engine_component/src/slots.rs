//! Per-entity component storage.
//!
//! [`ComponentSlots`] is a sparse array of boxed components addressed by
//! [`ComponentIndex`]. Indices are small and dense across a registry.

use crate::component::{Component, ComponentIndex, ErasedComponent};

/// The components attached to one entity.
#[derive(Debug, Default)]
pub struct ComponentSlots {
    slots: Vec<Option<Box<dyn ErasedComponent>>>,
    len: usize,
}

impl ComponentSlots {
    /// Create an empty slot array.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the component at `index`, if present.
    #[must_use]
    pub fn get(&self, index: ComponentIndex) -> Option<&dyn ErasedComponent> {
        self.slots.get(index.slot())?.as_deref()
    }

    /// Returns the component at `index` mutably, if present.
    #[must_use]
    pub fn get_mut(&mut self, index: ComponentIndex) -> Option<&mut dyn ErasedComponent> {
        match self.slots.get_mut(index.slot()) {
            Some(Some(component)) => Some(component.as_mut()),
            _ => None,
        }
    }

    /// Returns the component of type `T`, if present.
    #[must_use]
    pub fn get_typed<T: Component>(&self) -> Option<&T> {
        self.get(T::INDEX)?.downcast_ref::<T>()
    }

    /// Returns `true` if a component occupies `index`.
    #[must_use]
    pub fn has(&self, index: ComponentIndex) -> bool {
        self.get(index).is_some()
    }

    /// Store `component` at its own index, returning whatever was there.
    pub fn set(&mut self, component: Box<dyn ErasedComponent>) -> Option<Box<dyn ErasedComponent>> {
        let slot = component.index().slot();
        if slot >= self.slots.len() {
            self.slots.resize_with(slot + 1, || None);
        }
        let previous = self.slots[slot].replace(component);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Remove and return the component at `index`.
    pub fn remove(&mut self, index: ComponentIndex) -> Option<Box<dyn ErasedComponent>> {
        let removed = self.slots.get_mut(index.slot())?.take();
        if removed.is_some() {
            self.len -= 1;
            while matches!(self.slots.last(), Some(None)) {
                self.slots.pop();
            }
        }
        removed
    }

    /// Iterate the occupied indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = ComponentIndex> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| ComponentIndex(i as u16))
    }

    /// Returns the number of components stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no component is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Health(f32);

    impl Component for Health {
        const INDEX: ComponentIndex = ComponentIndex(5);
        const NAME: &'static str = "Health";
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Tag;

    impl Component for Tag {
        const INDEX: ComponentIndex = ComponentIndex(0);
        const NAME: &'static str = "Tag";
    }

    #[test]
    fn test_set_and_get() {
        let mut slots = ComponentSlots::new();
        assert!(slots.set(Box::new(Health(10.0))).is_none());
        assert!(slots.has(ComponentIndex(5)));
        assert!(!slots.has(ComponentIndex(4)));
        assert_eq!(slots.get_typed::<Health>(), Some(&Health(10.0)));
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn test_set_replaces() {
        let mut slots = ComponentSlots::new();
        slots.set(Box::new(Health(10.0)));
        let previous = slots.set(Box::new(Health(4.0))).unwrap();
        assert_eq!(previous.downcast_ref::<Health>(), Some(&Health(10.0)));
        assert_eq!(slots.get_typed::<Health>(), Some(&Health(4.0)));
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn test_remove_shrinks() {
        let mut slots = ComponentSlots::new();
        slots.set(Box::new(Tag));
        slots.set(Box::new(Health(1.0)));
        assert!(slots.remove(ComponentIndex(5)).is_some());
        assert!(slots.remove(ComponentIndex(5)).is_none());
        assert_eq!(slots.indices().collect::<Vec<_>>(), vec![ComponentIndex(0)]);
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn test_get_mut() {
        let mut slots = ComponentSlots::new();
        slots.set(Box::new(Health(1.0)));
        slots
            .get_mut(ComponentIndex(5))
            .and_then(|c| c.downcast_mut::<Health>())
            .unwrap()
            .0 = 2.0;
        assert_eq!(slots.get_typed::<Health>(), Some(&Health(2.0)));
    }

    #[test]
    fn test_out_of_range_lookups() {
        let mut slots = ComponentSlots::new();
        assert!(slots.get(ComponentIndex(100)).is_none());
        assert!(slots.remove(ComponentIndex(100)).is_none());
        assert!(slots.is_empty());
    }
}
