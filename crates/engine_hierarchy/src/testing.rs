//! Component fixtures shared by the unit tests.

use engine_component::{Component, ComponentIndex, ComponentRegistry, Entity, ErasedComponent, ParentRelative};

pub const HEALTH: ComponentIndex = ComponentIndex(1);
pub const OFFSET: ComponentIndex = ComponentIndex(3);
pub const BROKEN: ComponentIndex = ComponentIndex(4);

#[derive(Debug, Clone, PartialEq)]
pub struct Health(pub f32);

impl Component for Health {
    const INDEX: ComponentIndex = HEALTH;
    const NAME: &'static str = "Health";
}

/// A relative integer offset: `world` is the parent's `world` plus `local`.
#[derive(Debug, Clone, PartialEq)]
pub struct Offset {
    pub local: i64,
    pub world: i64,
    /// Number of times this value was recomputed from a parent.
    pub recomputes: u32,
}

impl Offset {
    pub fn new(local: i64) -> Self {
        Self {
            local,
            world: local,
            recomputes: 0,
        }
    }
}

impl Component for Offset {
    const INDEX: ComponentIndex = OFFSET;
    const NAME: &'static str = "Offset";

    fn as_parent_relative(&mut self) -> Option<&mut dyn ParentRelative> {
        Some(self)
    }
}

impl ParentRelative for Offset {
    fn recompute_from_parent(&mut self, parent: &dyn ErasedComponent, _owner: Entity) {
        if let Some(parent) = parent.downcast_ref::<Offset>() {
            self.world = parent.world + self.local;
            self.recomputes += 1;
        }
    }
}

/// Registered as relative, but never exposes the capability.
#[derive(Debug, Clone, PartialEq)]
pub struct Broken;

impl Component for Broken {
    const INDEX: ComponentIndex = BROKEN;
    const NAME: &'static str = "Broken";
}

impl ParentRelative for Broken {
    fn recompute_from_parent(&mut self, _parent: &dyn ErasedComponent, _owner: Entity) {}
}

/// Never registered with the test registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Unregistered;

impl Component for Unregistered {
    const INDEX: ComponentIndex = ComponentIndex(9);
    const NAME: &'static str = "Unregistered";
}

pub fn registry() -> ComponentRegistry {
    ComponentRegistry::new()
        .with::<Health>()
        .and_then(ComponentRegistry::with_relative::<Offset>)
        .and_then(ComponentRegistry::with_relative::<Broken>)
        .expect("fixture indices are distinct")
}
