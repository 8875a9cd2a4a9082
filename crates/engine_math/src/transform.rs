//! 3D transforms and their parent-relative component.
//!
//! [`Transform3D`] is a plain value: position, rotation, and scale.
//! [`RelativeTransform`] is the component an entity carries. It pairs a
//! transform local to the parent with the world-space transform derived
//! from it.

use engine_component::{Component, ComponentIndex, Entity, ErasedComponent, ParentRelative};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A 3D transform representing position, rotation, and per-axis scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform3D {
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform3D {
    /// The identity transform: origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a new transform with the given position and default rotation/scale.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Create a new transform with position and rotation.
    #[must_use]
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Compute the 4×4 model matrix for this transform.
    #[must_use]
    pub fn to_matrix(&self) -> glam::Mat4 {
        glam::Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Express `child`, given in this transform's space, in the outer space.
    ///
    /// Scale is composed per axis, so a rotated child under non-uniform
    /// scale loses its shear.
    #[must_use]
    pub fn mul_transform(&self, child: &Transform3D) -> Transform3D {
        Transform3D {
            position: self.position + self.rotation * (self.scale * child.position),
            rotation: self.rotation * child.rotation,
            scale: self.scale * child.scale,
        }
    }

    /// Transform a point from this space to the outer space.
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * (self.scale * point)
    }

    #[must_use]
    pub fn translated(mut self, offset: Vec3) -> Self {
        self.position += offset;
        self
    }

    #[must_use]
    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.rotation = rotation * self.rotation;
        self
    }

    #[must_use]
    pub fn scaled(mut self, factor: f32) -> Self {
        self.scale *= factor;
        self
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A transform that follows its parent's.
///
/// `local` is authored; `world` is derived. On an entity without a parent
/// the two are equal. Once the entity is linked under a parent that also has
/// a `RelativeTransform`, `world` is recomputed as the parent's `world`
/// composed with `local` every time the parent's transform changes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct RelativeTransform {
    pub local: Transform3D,
    pub world: Transform3D,
}

impl RelativeTransform {
    /// A root transform: world equals local.
    #[must_use]
    pub fn new(local: Transform3D) -> Self {
        Self { local, world: local }
    }

    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self::new(Transform3D::from_position(position))
    }

    /// Replace the local transform, keeping `world` consistent for a root.
    ///
    /// On a linked entity the sync from the parent overwrites `world`.
    pub fn set_local(&mut self, local: Transform3D) {
        self.local = local;
        self.world = local;
    }

    #[must_use]
    pub fn world_position(&self) -> Vec3 {
        self.world.position
    }
}

impl Component for RelativeTransform {
    const INDEX: ComponentIndex = ComponentIndex(3);
    const NAME: &'static str = "RelativeTransform";

    fn as_parent_relative(&mut self) -> Option<&mut dyn ParentRelative> {
        Some(self)
    }
}

impl ParentRelative for RelativeTransform {
    fn recompute_from_parent(&mut self, parent: &dyn ErasedComponent, _owner: Entity) {
        if let Some(parent) = parent.downcast_ref::<RelativeTransform>() {
            self.world = parent.world.mul_transform(&self.local);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        a.abs_diff_eq(b, 1e-5)
    }

    #[test]
    fn test_identity_transform() {
        let t = Transform3D::IDENTITY;
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.to_matrix(), glam::Mat4::IDENTITY);
    }

    #[test]
    fn test_identity_composition() {
        let t = Transform3D::from_position(Vec3::new(1.0, 2.0, 3.0)).scaled(2.0);
        assert_eq!(Transform3D::IDENTITY.mul_transform(&t), t);
        assert_eq!(t.mul_transform(&Transform3D::IDENTITY), t);
    }

    #[test]
    fn test_composition_matches_matrix_product() {
        let parent = Transform3D::from_position_rotation(Vec3::new(0.0, 1.0, 0.0), Quat::from_rotation_z(FRAC_PI_2))
            .scaled(2.0);
        let child = Transform3D::from_position(Vec3::new(1.0, 0.0, 0.0));

        let composed = parent.mul_transform(&child);
        let expected = parent.to_matrix() * child.to_matrix();
        assert!(approx(composed.position, expected.w_axis.truncate()));
        assert!(approx(composed.position, Vec3::new(0.0, 3.0, 0.0)));
        assert!(approx(parent.transform_point(child.position), composed.position));
    }

    #[test]
    fn test_rotated_parent_swings_child() {
        let quarter = Quat::from_rotation_z(FRAC_PI_2);
        let parent = Transform3D::from_position(Vec3::new(5.0, 0.0, 0.0)).rotated(quarter);
        let child = Transform3D::from_position(Vec3::X);
        assert!(approx(parent.mul_transform(&child).position, Vec3::new(5.0, 1.0, 0.0)));

        // Rotations accumulate on the left; position is untouched.
        let half = parent.rotated(quarter);
        assert_eq!(half.position, parent.position);
        assert!(approx(half.mul_transform(&child).position, Vec3::new(4.0, 0.0, 0.0)));
    }

    #[test]
    fn test_recompute_from_parent() {
        let parent = RelativeTransform::from_position(Vec3::new(10.0, 0.0, 0.0));
        let mut child = RelativeTransform::from_position(Vec3::new(0.0, 1.0, 0.0));

        child.recompute_from_parent(&parent, Entity::from_raw(2));
        assert_eq!(child.world_position(), Vec3::new(10.0, 1.0, 0.0));
        assert_eq!(child.local.position, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_recompute_ignores_foreign_component() {
        #[derive(Debug, Clone)]
        struct Other;
        impl Component for Other {
            const INDEX: ComponentIndex = ComponentIndex(3);
            const NAME: &'static str = "Other";
        }

        let mut child = RelativeTransform::from_position(Vec3::X);
        child.recompute_from_parent(&Other, Entity::from_raw(1));
        assert_eq!(child.world_position(), Vec3::X);
    }

    #[test]
    fn test_exposes_parent_relative_capability() {
        let mut boxed: Box<dyn ErasedComponent> = Box::new(RelativeTransform::default());
        assert!(boxed.as_parent_relative().is_some());
        assert_eq!(boxed.index(), RelativeTransform::INDEX);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let t = RelativeTransform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let bytes = rmp_serde::to_vec(&t).unwrap();
        let restored: RelativeTransform = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(t, restored);
    }
}
