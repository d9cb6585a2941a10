//! Camera component

use bevy_ecs::prelude::*;
use glam::{Mat4, UVec2, Vec3};

/// Camera projection type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        /// Vertical field of view in radians
        fov_y: f32,
        near: f32,
        far: f32,
    },
    Orthographic {
        /// Height of the view volume; width follows the viewport aspect
        height: f32,
        near: f32,
        far: f32,
    },
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Perspective {
            fov_y: std::f32::consts::FRAC_PI_2,
            near: 0.01,
            far: 100.0,
        }
    }
}

impl Projection {
    pub fn perspective(fov_y_degrees: f32, near: f32, far: f32) -> Self {
        Projection::Perspective {
            fov_y: fov_y_degrees.to_radians(),
            near,
            far,
        }
    }

    pub fn orthographic(height: f32, near: f32, far: f32) -> Self {
        Projection::Orthographic { height, near, far }
    }

    /// Projection matrix for a viewport of the given size
    pub fn matrix(&self, viewport: UVec2) -> Mat4 {
        let aspect = viewport.x.max(1) as f32 / viewport.y.max(1) as f32;
        match *self {
            Projection::Perspective { fov_y, near, far } => {
                Mat4::perspective_rh_gl(fov_y, aspect, near, far)
            }
            Projection::Orthographic { height, near, far } => {
                let half_h = height / 2.0;
                let half_w = half_h * aspect;
                Mat4::orthographic_rh_gl(-half_w, half_w, -half_h, half_h, near, far)
            }
        }
    }

    pub fn near(&self) -> f32 {
        match self {
            Projection::Perspective { near, .. } => *near,
            Projection::Orthographic { near, .. } => *near,
        }
    }

    pub fn far(&self) -> f32 {
        match self {
            Projection::Perspective { far, .. } => *far,
            Projection::Orthographic { far, .. } => *far,
        }
    }
}

/// Camera component.
///
/// The camera looks down the owning entity's local -Z axis with local +Y
/// up; position and orientation come from the entity's world transform.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Camera {
    pub projection: Projection,
}

impl Camera {
    pub fn new(projection: Projection) -> Self {
        Self { projection }
    }

    /// View matrix given the owning entity's local-to-world matrix
    pub fn view_matrix(&self, local_to_world: Mat4) -> Mat4 {
        let eye = local_to_world.transform_point3(Vec3::ZERO);
        let center = local_to_world.transform_point3(Vec3::NEG_Z);
        let up = local_to_world.transform_vector3(Vec3::Y);
        Mat4::look_at_rh(eye, center, up)
    }

    /// Projection matrix for a viewport of the given size
    pub fn projection_matrix(&self, viewport: UVec2) -> Mat4 {
        self.projection.matrix(viewport)
    }
}

/// The camera selected for a frame together with its world transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub entity: Entity,
    pub camera: Camera,
    pub local_to_world: Mat4,
}

impl CameraView {
    pub fn view_matrix(&self) -> Mat4 {
        self.camera.view_matrix(self.local_to_world)
    }

    pub fn projection_matrix(&self, viewport: UVec2) -> Mat4 {
        self.camera.projection_matrix(viewport)
    }

    /// Get combined view-projection matrix
    pub fn view_projection_matrix(&self, viewport: UVec2) -> Mat4 {
        self.projection_matrix(viewport) * self.view_matrix()
    }

    /// World-space camera position
    pub fn position(&self) -> Vec3 {
        self.local_to_world.transform_point3(Vec3::ZERO)
    }

    /// World-space direction the camera looks along
    pub fn forward(&self) -> Vec3 {
        self.local_to_world
            .transform_vector3(Vec3::NEG_Z)
            .normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec4};

    fn view_at(local_to_world: Mat4) -> CameraView {
        CameraView {
            entity: Entity::from_raw(0),
            camera: Camera::default(),
            local_to_world,
        }
    }

    #[test]
    fn view_matrix_inverts_placement() {
        let placement = Mat4::from_rotation_translation(
            Quat::from_rotation_y(0.7),
            Vec3::new(3.0, -2.0, 5.0),
        );
        let view = view_at(placement).view_matrix();
        assert!((view * placement).abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }

    #[test]
    fn forward_follows_rotation() {
        let yaw = Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let forward = view_at(yaw).forward();
        assert!(forward.abs_diff_eq(Vec3::NEG_X, 1e-5));
    }

    #[test]
    fn forward_ignores_scale() {
        let scaled = Mat4::from_scale(Vec3::splat(4.0));
        assert!(view_at(scaled).forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn perspective_maps_far_plane_to_one() {
        let projection = Projection::perspective(60.0, 0.1, 50.0);
        let clip = projection.matrix(UVec2::new(1280, 720)) * Vec4::new(0.0, 0.0, -50.0, 1.0);
        assert!((clip.z / clip.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn orthographic_width_follows_aspect() {
        let projection = Projection::orthographic(2.0, 0.1, 10.0);
        let clip = projection.matrix(UVec2::new(200, 100)) * Vec4::new(2.0, 1.0, -1.0, 1.0);
        assert!((clip.x - 1.0).abs() < 1e-6);
        assert!((clip.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_viewport_does_not_divide_by_zero() {
        let matrix = Projection::default().matrix(UVec2::ZERO);
        assert!(matrix.is_finite());
    }
}
