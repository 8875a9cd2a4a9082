//! World-level error types.

use engine_component::{ComponentIndex, Entity};

/// Errors returned by component mutations on a [`World`](crate::World).
///
/// Hierarchy operations never return these: stale ids there are routine and
/// resolve to a no-op.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The entity was never spawned or has been destroyed.
    #[error("{0} is not a live entity")]
    EntityNotFound(Entity),

    /// The component's index is not in the world's registry.
    #[error("component `{name}` at index {index} is not registered")]
    UnregisteredComponent {
        index: ComponentIndex,
        name: &'static str,
    },

    /// The entity has no component at the requested index.
    #[error("{entity} has no component at index {index}")]
    ComponentNotFound {
        entity: Entity,
        index: ComponentIndex,
    },
}
