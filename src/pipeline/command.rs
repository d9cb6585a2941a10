//! Per-object draw descriptors

use crate::resources::{Material, Mesh};
use glam::{Mat4, Vec3};
use std::sync::Arc;

/// Everything needed to draw one object this frame
#[derive(Debug, Clone)]
pub struct RenderCommand {
    pub local_to_world: Mat4,
    /// Object origin in local space
    pub center: Vec3,
    pub mesh: Arc<Mesh>,
    pub material: Arc<Material>,
}

impl RenderCommand {
    pub fn new(local_to_world: Mat4, mesh: Arc<Mesh>, material: Arc<Material>) -> Self {
        Self {
            local_to_world,
            center: Vec3::ZERO,
            mesh,
            material,
        }
    }

    /// Object center in world space
    pub fn world_center(&self) -> Vec3 {
        self.local_to_world.transform_point3(self.center)
    }

    /// Distance along `forward` used to order transparent objects
    pub fn view_depth(&self, forward: Vec3) -> f32 {
        self.world_center().dot(forward)
    }
}
