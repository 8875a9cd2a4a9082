//! Multicast listener lists and the per-index notification registry.
//!
//! Listeners are identified by [`SubscriptionId`] tokens handed out by the
//! [`World`]. Removal is by token, never by comparing callbacks, so the same
//! logical subscriber can be registered twice and each registration is
//! removed independently.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use engine_component::{ComponentIndex, Entity, ErasedComponent};

use crate::world::World;

/// Token identifying one registration in a [`Multicast`] list.
///
/// Tokens come from a per-world counter and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Callback invoked when a tracked component changes.
///
/// Receives the world, the entity whose component changed, the component
/// index, and the new value.
pub type ComponentCallback = Rc<dyn Fn(&mut World, Entity, ComponentIndex, &dyn ErasedComponent)>;

/// Callback invoked when an entity is destroyed.
pub type DestroyCallback = Rc<dyn Fn(&mut World, Entity)>;

/// A listener on an entity's component changes.
#[derive(Clone)]
pub enum ComponentListener {
    /// The given child recomputes its relative component from the change.
    ParentModified(Entity),
    /// An arbitrary callback registered through the world.
    Callback(ComponentCallback),
}

impl fmt::Debug for ComponentListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParentModified(child) => f.debug_tuple("ParentModified").field(child).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// A listener on an entity's destruction.
#[derive(Clone)]
pub enum DestroyListener {
    /// The given child is destroyed along with its parent.
    Cascade(Entity),
    /// An arbitrary callback registered through the world.
    Callback(DestroyCallback),
}

impl fmt::Debug for DestroyListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cascade(child) => f.debug_tuple("Cascade").field(child).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// An ordered list of listeners.
///
/// Dispatch order is registration order.
#[derive(Debug, Clone)]
pub struct Multicast<L> {
    listeners: Vec<(SubscriptionId, L)>,
}

impl<L: Clone> Multicast<L> {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Append a listener.
    pub fn subscribe(&mut self, id: SubscriptionId, listener: L) {
        self.listeners.push((id, listener));
    }

    /// Remove the registration identified by `id`.
    ///
    /// Returns `true` if it was present.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        match self.listeners.iter().position(|(sub, _)| *sub == id) {
            Some(pos) => {
                self.listeners.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Returns `true` if `id` is currently registered.
    #[must_use]
    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.listeners.iter().any(|(sub, _)| *sub == id)
    }

    /// Snapshot of the current registrations, in dispatch order.
    ///
    /// Dispatch iterates a snapshot because listeners may subscribe or
    /// unsubscribe while it runs.
    #[must_use]
    pub fn listeners(&self) -> Vec<(SubscriptionId, L)> {
        self.listeners.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<L: Clone> Default for Multicast<L> {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-entity map from component index to the listeners on that index.
///
/// The map is allocated on first [`track`](Self::track) and released again
/// once the last listener is removed, so entities nobody observes carry no
/// allocation. An index whose list empties is removed from the map.
#[derive(Debug, Clone)]
pub struct ComponentNotifications<L> {
    tracked: Option<HashMap<ComponentIndex, Multicast<L>>>,
}

impl<L: Clone> ComponentNotifications<L> {
    #[must_use]
    pub fn new() -> Self {
        Self { tracked: None }
    }

    /// Append `listener` to the list at `index`.
    pub fn track(&mut self, index: ComponentIndex, id: SubscriptionId, listener: L) {
        self.tracked
            .get_or_insert_with(HashMap::new)
            .entry(index)
            .or_default()
            .subscribe(id, listener);
    }

    /// Remove the registration `id` from the list at `index`.
    ///
    /// Returns `true` if it was present.
    pub fn untrack(&mut self, index: ComponentIndex, id: SubscriptionId) -> bool {
        let Some(tracked) = self.tracked.as_mut() else {
            return false;
        };
        let Some(list) = tracked.get_mut(&index) else {
            return false;
        };
        let removed = list.unsubscribe(id);
        if list.is_empty() {
            tracked.remove(&index);
        }
        if tracked.is_empty() {
            self.tracked = None;
        }
        removed
    }

    /// Returns `true` if `id` is registered at `index`.
    #[must_use]
    pub fn contains(&self, index: ComponentIndex, id: SubscriptionId) -> bool {
        self.list(index).is_some_and(|list| list.contains(id))
    }

    /// Snapshot of the listeners at `index`, in dispatch order.
    #[must_use]
    pub fn listeners(&self, index: ComponentIndex) -> Vec<(SubscriptionId, L)> {
        self.list(index).map(Multicast::listeners).unwrap_or_default()
    }

    /// Number of listeners at `index`.
    #[must_use]
    pub fn count(&self, index: ComponentIndex) -> usize {
        self.list(index).map_or(0, Multicast::len)
    }

    /// Returns `true` if anything listens at `index`.
    #[must_use]
    pub fn is_tracking(&self, index: ComponentIndex) -> bool {
        self.list(index).is_some()
    }

    /// Returns `true` if the backing map is allocated.
    #[must_use]
    pub fn is_allocated(&self) -> bool {
        self.tracked.is_some()
    }

    fn list(&self, index: ComponentIndex) -> Option<&Multicast<L>> {
        self.tracked.as_ref()?.get(&index)
    }
}

impl<L: Clone> Default for ComponentNotifications<L> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ComponentIndex = ComponentIndex(1);
    const B: ComponentIndex = ComponentIndex(2);

    #[test]
    fn test_multicast_preserves_registration_order() {
        let mut list = Multicast::new();
        list.subscribe(SubscriptionId(3), "c");
        list.subscribe(SubscriptionId(1), "a");
        list.subscribe(SubscriptionId(2), "b");
        let order: Vec<_> = list.listeners().into_iter().map(|(_, l)| l).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_multicast_unsubscribe_removes_exactly_one() {
        let mut list = Multicast::new();
        list.subscribe(SubscriptionId(1), "same");
        list.subscribe(SubscriptionId(2), "same");
        assert!(list.unsubscribe(SubscriptionId(1)));
        assert!(!list.unsubscribe(SubscriptionId(1)));
        assert_eq!(list.len(), 1);
        assert!(list.contains(SubscriptionId(2)));
    }

    #[test]
    fn test_notifications_lazily_allocated() {
        let notifications: ComponentNotifications<u8> = ComponentNotifications::new();
        assert!(!notifications.is_allocated());
        assert_eq!(notifications.count(A), 0);
        assert!(notifications.listeners(A).is_empty());
    }

    #[test]
    fn test_untrack_last_listener_drops_index_and_map() {
        let mut notifications = ComponentNotifications::new();
        notifications.track(A, SubscriptionId(1), 'x');
        notifications.track(B, SubscriptionId(2), 'y');

        assert!(notifications.untrack(A, SubscriptionId(1)));
        assert!(!notifications.is_tracking(A));
        assert!(notifications.is_allocated());

        assert!(notifications.untrack(B, SubscriptionId(2)));
        assert!(!notifications.is_allocated());
    }

    #[test]
    fn test_untrack_unknown_is_noop() {
        let mut notifications = ComponentNotifications::new();
        assert!(!notifications.untrack(A, SubscriptionId(1)));
        notifications.track(A, SubscriptionId(1), ());
        assert!(!notifications.untrack(A, SubscriptionId(9)));
        assert!(!notifications.untrack(B, SubscriptionId(1)));
        assert_eq!(notifications.count(A), 1);
    }
}
