//! Transform and hierarchy components

use bevy_ecs::prelude::*;
use glam::{EulerRot, Mat4, Quat, Vec3};

/// Local transform relative to the parent entity (or the world)
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Create transform from position, rotation (YXZ euler angles in radians), and scale
    pub fn from_components(position: Vec3, rotation_euler: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::from_euler(
                EulerRot::YXZ,
                rotation_euler.y,
                rotation_euler.x,
                rotation_euler.z,
            ),
            scale,
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Matrix from this entity's local space to its parent's space
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Makes this entity's [`Transform`] relative to another entity
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub Entity);

/// Longest parent chain followed before assuming a cycle
const MAX_HIERARCHY_DEPTH: usize = 64;

/// Compose the transforms from `entity` up to its root.
///
/// Entities without a [`Transform`] contribute identity. A parent that no
/// longer exists ends the chain.
pub fn local_to_world(world: &World, entity: Entity) -> Mat4 {
    let mut matrix = Mat4::IDENTITY;
    let mut current = Some(entity);
    let mut depth = 0;

    while let Some(id) = current {
        if depth == MAX_HIERARCHY_DEPTH {
            log::warn!("Parent chain of {:?} exceeds {} levels", entity, MAX_HIERARCHY_DEPTH);
            break;
        }
        if let Some(transform) = world.get::<Transform>(id) {
            matrix = transform.matrix() * matrix;
        }
        current = world.get::<Parent>(id).map(|parent| parent.0);
        depth += 1;
    }

    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_entity_uses_own_transform() {
        let mut world = World::new();
        let transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let entity = world.spawn(transform).id();
        assert_eq!(local_to_world(&world, entity), transform.matrix());
    }

    #[test]
    fn missing_transform_is_identity() {
        let mut world = World::new();
        let entity = world.spawn_empty().id();
        assert_eq!(local_to_world(&world, entity), Mat4::IDENTITY);
    }

    #[test]
    fn child_is_relative_to_parent() {
        let mut world = World::new();
        let parent = world
            .spawn(Transform::from_components(
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0),
                Vec3::ONE,
            ))
            .id();
        let child = world
            .spawn((Transform::from_position(Vec3::new(0.0, 0.0, -1.0)), Parent(parent)))
            .id();

        let origin = local_to_world(&world, child).transform_point3(Vec3::ZERO);
        // Yaw of +90 degrees turns local -Z into world -X.
        assert!(origin.abs_diff_eq(Vec3::new(9.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn cycles_terminate() {
        let mut world = World::new();
        let a = world.spawn(Transform::default()).id();
        let b = world.spawn((Transform::default(), Parent(a))).id();
        world.entity_mut(a).insert(Parent(b));
        assert_eq!(local_to_world(&world, a), Mat4::IDENTITY);
    }

    #[test]
    fn despawned_parent_ends_chain() {
        let mut world = World::new();
        let parent = world.spawn(Transform::from_position(Vec3::X)).id();
        let child = world
            .spawn((Transform::from_position(Vec3::Y), Parent(parent)))
            .id();
        world.despawn(parent);
        let origin = local_to_world(&world, child).transform_point3(Vec3::ZERO);
        assert_eq!(origin, Vec3::Y);
    }
}
