//! The world: entity records, component access, and change dispatch.
//!
//! The [`World`] owns every [`EntityNode`]. Entities refer to each other only
//! by [`Entity`] id, and every cross-entity step (linking, notifying,
//! cascading a destroy) re-resolves ids through the world. Nothing holds a
//! borrow across a callback.
//!
//! ## Dispatch
//!
//! Component changes are dispatched synchronously from the call that made
//! them. Listeners run in registration order on a snapshot of the list taken
//! when dispatch starts; a listener that was unsubscribed by an earlier one
//! in the same dispatch is skipped.
//!
//! ## Destruction
//!
//! [`World::destroy`] runs in a fixed order:
//!
//! 1. Mark the entity destroyed.
//! 2. Unparent it.
//! 3. Dispatch its destroy notification. Children cascade here; when they
//!    remove themselves from this entity's child set, the destroyed flag
//!    stops the parent from calling back into them.
//! 4. Unparent any child still linked.
//! 5. Drop the record, which makes the id stale.

use std::collections::HashMap;
use std::rc::Rc;

use engine_component::{Component, ComponentIndex, ComponentRegistry, Entity, EntityAllocator, ErasedComponent};
use tracing::{debug, trace};

use crate::config::WorldConfig;
use crate::error::WorldError;
use crate::event::{ComponentListener, DestroyListener, SubscriptionId};
use crate::node::EntityNode;

/// Entity container and the entry point for every hierarchy operation.
#[derive(Debug)]
pub struct World {
    pub(crate) config: WorldConfig,
    pub(crate) registry: ComponentRegistry,
    allocator: EntityAllocator,
    pub(crate) entities: HashMap<Entity, EntityNode>,
    next_subscription: u64,
}

impl World {
    /// Create an empty world over `registry`.
    #[must_use]
    pub fn new(registry: ComponentRegistry) -> Self {
        Self::with_config(registry, WorldConfig::default())
    }

    /// Create an empty world with an explicit configuration.
    #[must_use]
    pub fn with_config(registry: ComponentRegistry, config: WorldConfig) -> Self {
        Self {
            entities: HashMap::with_capacity(config.initial_capacity),
            config,
            registry,
            allocator: EntityAllocator::new(),
            next_subscription: 1,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    // -- Entity lifecycle --

    /// Spawn an entity with no components.
    pub fn spawn(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        self.entities.insert(entity, EntityNode::new(entity));
        trace!(%entity, "spawned entity");
        entity
    }

    /// Spawn an entity with initial components.
    ///
    /// Every component is checked against the registry first; on error no
    /// entity is created.
    pub fn spawn_with<I>(&mut self, components: I) -> Result<Entity, WorldError>
    where
        I: IntoIterator<Item = Box<dyn ErasedComponent>>,
    {
        let components: Vec<_> = components.into_iter().collect();
        if let Some(unknown) = components
            .iter()
            .find(|component| !self.registry.contains(component.index()))
        {
            return Err(WorldError::UnregisteredComponent {
                index: unknown.index(),
                name: unknown.type_name(),
            });
        }

        let entity = self.spawn();
        if let Some(node) = self.entities.get_mut(&entity) {
            for component in components {
                node.components.set(component);
            }
        }
        Ok(entity)
    }

    /// Destroy `entity` and, through the destroy cascade, its descendants.
    ///
    /// A no-op for unknown ids and for an entity already being destroyed.
    pub fn destroy(&mut self, entity: Entity) {
        let Some(node) = self.entities.get_mut(&entity) else {
            return;
        };
        if node.destroyed {
            return;
        }
        node.destroyed = true;
        debug!(%entity, children = node.children.len(), "destroying entity");

        self.unparent(entity);

        let listeners = self
            .entities
            .get(&entity)
            .map(|node| node.on_destroyed.listeners())
            .unwrap_or_default();
        for (id, listener) in listeners {
            let registered = self
                .entities
                .get(&entity)
                .is_some_and(|node| node.on_destroyed.contains(id));
            if !registered {
                continue;
            }
            match listener {
                DestroyListener::Cascade(child) => self.destroy(child),
                DestroyListener::Callback(callback) => callback(self, entity),
            }
        }

        let remaining = self
            .entities
            .get(&entity)
            .map(|node| node.children.ids().to_vec())
            .unwrap_or_default();
        for child in remaining {
            let linked = self
                .entities
                .get(&child)
                .is_some_and(|node| node.parent == Some(entity));
            if linked {
                self.unparent(child);
            }
        }

        if let Some(mut node) = self.entities.remove(&entity) {
            // Anything left here disagreed with the child's own parent field.
            node.children.clear();
            debug_assert!(node.parent.is_none(), "{entity} destroyed while still linked");
        }
        trace!(%entity, "entity destroyed");
    }

    /// Returns `true` if `entity` resolves to a live entity.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.try_get_entity(entity).is_some()
    }

    /// Resolve an id to a live entity.
    #[must_use]
    pub fn try_get_entity(&self, entity: Entity) -> Option<&EntityNode> {
        self.entities.get(&entity).filter(|node| !node.destroyed)
    }

    /// Resolve an id known to be live.
    ///
    /// # Panics
    ///
    /// If `entity` is stale or unknown. Use [`try_get_entity`](Self::try_get_entity)
    /// where that is a routine outcome.
    #[must_use]
    pub fn get_entity(&self, entity: Entity) -> &EntityNode {
        match self.try_get_entity(entity) {
            Some(node) => node,
            None => panic!("{entity} is not a live entity"),
        }
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.values().filter(|node| !node.destroyed).count()
    }

    /// Iterate live entity ids, in no particular order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities
            .values()
            .filter(|node| !node.destroyed)
            .map(|node| node.id)
    }

    pub(crate) fn next_subscription_id(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        id
    }

    // -- Component operations --

    #[must_use]
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.try_get_entity(entity)?.get::<T>()
    }

    #[must_use]
    pub fn get_erased(&self, entity: Entity, index: ComponentIndex) -> Option<&dyn ErasedComponent> {
        self.try_get_entity(entity)?.get_erased(index)
    }

    #[must_use]
    pub fn has_component(&self, entity: Entity, index: ComponentIndex) -> bool {
        self.try_get_entity(entity)
            .is_some_and(|node| node.has_component(index))
    }

    /// Add or replace a component, then notify its listeners.
    pub fn insert<T: Component>(&mut self, entity: Entity, value: T) -> Result<(), WorldError> {
        self.insert_boxed(entity, Box::new(value))
    }

    /// Add or replace a type-erased component, then notify its listeners.
    ///
    /// On a linked child, a relative component is first recomputed from the
    /// parent (and newly tracked on it if the component was just added), so
    /// listeners only ever observe the parent-adjusted value.
    pub fn insert_boxed(
        &mut self,
        entity: Entity,
        value: Box<dyn ErasedComponent>,
    ) -> Result<(), WorldError> {
        let index = value.index();
        if !self.registry.contains(index) {
            return Err(WorldError::UnregisteredComponent {
                index,
                name: value.type_name(),
            });
        }
        let node = self
            .entities
            .get_mut(&entity)
            .filter(|node| !node.destroyed)
            .ok_or(WorldError::EntityNotFound(entity))?;
        let added = node.components.set(value).is_none();
        let parent = node.parent;
        trace!(%entity, %index, added, "component set");

        let synced = match parent {
            Some(parent) if self.registry.is_relative(index) => {
                if added {
                    self.track_parent_component(entity, parent, index)
                } else {
                    self.sync_from_parent(entity, parent, index)
                }
            }
            _ => false,
        };
        if !synced {
            self.notify(entity, index);
        }
        Ok(())
    }

    /// Read-modify-write a component through [`insert`](Self::insert).
    pub fn modify<T: Component>(
        &mut self,
        entity: Entity,
        f: impl FnOnce(&mut T),
    ) -> Result<(), WorldError> {
        let node = self
            .try_get_entity(entity)
            .ok_or(WorldError::EntityNotFound(entity))?;
        let mut value = node
            .get::<T>()
            .cloned()
            .ok_or(WorldError::ComponentNotFound {
                entity,
                index: T::INDEX,
            })?;
        f(&mut value);
        self.insert(entity, value)
    }

    /// Remove a component. Listeners are not notified.
    ///
    /// Removing a relative component from a linked child drops its
    /// subscription on the parent.
    pub fn remove_component(
        &mut self,
        entity: Entity,
        index: ComponentIndex,
    ) -> Result<Option<Box<dyn ErasedComponent>>, WorldError> {
        let node = self
            .entities
            .get_mut(&entity)
            .filter(|node| !node.destroyed)
            .ok_or(WorldError::EntityNotFound(entity))?;
        let removed = node.components.remove(index);
        if removed.is_some() && self.registry.is_relative(index) {
            self.untrack_parent_component(entity, index);
        }
        Ok(removed)
    }

    // -- Notifications --

    /// Register `callback` for changes to `entity`'s component at `index`.
    ///
    /// Returns `None` if the entity is not live.
    pub fn track_component<F>(
        &mut self,
        entity: Entity,
        index: ComponentIndex,
        callback: F,
    ) -> Option<SubscriptionId>
    where
        F: Fn(&mut World, Entity, ComponentIndex, &dyn ErasedComponent) + 'static,
    {
        let id = self.next_subscription_id();
        let node = self.entities.get_mut(&entity).filter(|node| !node.destroyed)?;
        node.tracked
            .track(index, id, ComponentListener::Callback(Rc::new(callback)));
        Some(id)
    }

    /// Remove a registration made by [`track_component`](Self::track_component).
    pub fn untrack_component(
        &mut self,
        entity: Entity,
        index: ComponentIndex,
        id: SubscriptionId,
    ) -> bool {
        self.entities
            .get_mut(&entity)
            .is_some_and(|node| node.tracked.untrack(index, id))
    }

    /// Register `callback` to run when `entity` is destroyed.
    pub fn subscribe_destroyed<F>(&mut self, entity: Entity, callback: F) -> Option<SubscriptionId>
    where
        F: Fn(&mut World, Entity) + 'static,
    {
        let id = self.next_subscription_id();
        let node = self.entities.get_mut(&entity).filter(|node| !node.destroyed)?;
        node.on_destroyed
            .subscribe(id, DestroyListener::Callback(Rc::new(callback)));
        Some(id)
    }

    /// Remove a registration made by [`subscribe_destroyed`](Self::subscribe_destroyed).
    pub fn unsubscribe_destroyed(&mut self, entity: Entity, id: SubscriptionId) -> bool {
        self.entities
            .get_mut(&entity)
            .is_some_and(|node| node.on_destroyed.unsubscribe(id))
    }

    /// Dispatch the current value of `entity`'s component at `index` to its
    /// listeners.
    pub(crate) fn notify(&mut self, entity: Entity, index: ComponentIndex) {
        let Some(node) = self.entities.get(&entity) else {
            return;
        };
        let listeners = node.tracked.listeners(index);
        if listeners.is_empty() {
            return;
        }
        let Some(value) = node.components.get(index).map(|value| value.clone_erased()) else {
            return;
        };
        trace!(%entity, %index, listeners = listeners.len(), "dispatching component change");

        for (id, listener) in listeners {
            let registered = self
                .entities
                .get(&entity)
                .is_some_and(|node| node.tracked.contains(index, id));
            if !registered {
                continue;
            }
            match listener {
                ComponentListener::ParentModified(child) => {
                    self.on_parent_modified(child, index, &*value);
                }
                ComponentListener::Callback(callback) => callback(self, entity, index, &*value),
            }
        }
    }
}
