//! Per-entity record held by the [`World`](crate::World).
//!
//! [`EntityNode`] is the read-only face of an entity: its components and its
//! hierarchy fields. All mutation goes through the world so that both sides
//! of every parent/child link change together.

use engine_component::{Component, ComponentIndex, ComponentSlots, Entity, ErasedComponent};

use crate::children::ChildSet;
use crate::event::{ComponentListener, ComponentNotifications, DestroyListener, Multicast, SubscriptionId};

/// Subscriptions a child holds on its current parent.
///
/// Kept on the child so unlinking can remove exactly its own registrations.
#[derive(Debug, Default)]
pub(crate) struct ParentLink {
    /// One entry per relative component index tracked on the parent.
    pub(crate) components: Vec<(ComponentIndex, SubscriptionId)>,
    /// The cascade registration on the parent's destroy notification.
    pub(crate) on_destroyed: Option<SubscriptionId>,
}

/// An entity's components and hierarchy state.
#[derive(Debug)]
pub struct EntityNode {
    pub(crate) id: Entity,
    pub(crate) components: ComponentSlots,
    /// Non-owning back-reference; set only by reparenting.
    pub(crate) parent: Option<Entity>,
    pub(crate) parent_link: ParentLink,
    pub(crate) children: ChildSet,
    /// Listeners on this entity's own component changes.
    pub(crate) tracked: ComponentNotifications<ComponentListener>,
    pub(crate) on_destroyed: Multicast<DestroyListener>,
    pub(crate) destroyed: bool,
}

impl EntityNode {
    pub(crate) fn new(id: Entity) -> Self {
        Self {
            id,
            components: ComponentSlots::new(),
            parent: None,
            parent_link: ParentLink::default(),
            children: ChildSet::new(),
            tracked: ComponentNotifications::new(),
            on_destroyed: Multicast::new(),
            destroyed: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> Entity {
        self.id
    }

    /// The current parent, if linked.
    #[must_use]
    pub fn parent(&self) -> Option<Entity> {
        self.parent
    }

    /// Returns `true` once destruction has begun.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Child ids, in ascending order. Served from a cached snapshot.
    #[must_use]
    pub fn children(&self) -> &[Entity] {
        self.children.ids()
    }

    #[must_use]
    pub fn has_child(&self, child: Entity) -> bool {
        self.children.contains(child)
    }

    /// The name `child` was added under.
    #[must_use]
    pub fn child_name(&self, child: Entity) -> Option<&str> {
        self.children.name_of(child)
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    #[must_use]
    pub fn has_component(&self, index: ComponentIndex) -> bool {
        self.components.has(index)
    }

    #[must_use]
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.components.get_typed::<T>()
    }

    #[must_use]
    pub fn get_erased(&self, index: ComponentIndex) -> Option<&dyn ErasedComponent> {
        self.components.get(index)
    }

    /// Indices of the components attached, ascending.
    pub fn component_indices(&self) -> impl Iterator<Item = ComponentIndex> + '_ {
        self.components.indices()
    }

    /// Number of listeners on this entity's component at `index`.
    #[must_use]
    pub fn listener_count(&self, index: ComponentIndex) -> usize {
        self.tracked.count(index)
    }

    /// Number of listeners on this entity's destruction.
    #[must_use]
    pub fn destroy_listener_count(&self) -> usize {
        self.on_destroyed.len()
    }

    /// Returns `true` if this entity holds a subscription on its parent's
    /// component at `index`.
    #[must_use]
    pub fn is_tracking_parent(&self, index: ComponentIndex) -> bool {
        self.parent_link
            .components
            .iter()
            .any(|(tracked, _)| *tracked == index)
    }

    /// Returns `true` if any hierarchy or notification storage is allocated.
    ///
    /// Leaf entities nobody observes report `false`.
    #[must_use]
    pub fn has_hierarchy_storage(&self) -> bool {
        self.children.is_allocated() || self.tracked.is_allocated()
    }
}
