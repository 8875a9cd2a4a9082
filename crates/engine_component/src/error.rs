//! Component-layer error types.

use crate::component::ComponentIndex;

/// Errors raised while building a [`ComponentRegistry`](crate::ComponentRegistry).
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    /// Two different component types claimed the same slot index.
    #[error("component index {index} is already taken by `{existing}`, cannot register `{requested}`")]
    IndexTaken {
        index: ComponentIndex,
        existing: &'static str,
        requested: &'static str,
    },
}
