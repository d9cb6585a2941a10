//! Mesh renderer component

use crate::resources::{Material, Mesh};
use bevy_ecs::prelude::*;
use std::sync::Arc;

/// Draws a mesh with a material at the owning entity's world transform.
///
/// Meshes and materials are loaded once and shared between entities.
#[derive(Component, Debug, Clone)]
pub struct MeshRenderer {
    pub mesh: Arc<Mesh>,
    pub material: Arc<Material>,
}

impl MeshRenderer {
    pub fn new(mesh: Arc<Mesh>, material: Arc<Material>) -> Self {
        Self { mesh, material }
    }
}
