//! # engine_math
//!
//! Math types for the ECS engine. Re-exports [`glam`] for linear algebra and
//! defines [`RelativeTransform`], a spatial component that follows its
//! parent through the hierarchy's relative-component propagation.

pub mod transform;

// Re-export glam types for convenience.
pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

pub use transform::{RelativeTransform, Transform3D};
