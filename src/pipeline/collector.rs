//! Per-frame scene extraction

use super::RenderCommand;
use crate::scene::{local_to_world, Camera, CameraView, Light, MeshRenderer, WorldLight};
use bevy_ecs::prelude::*;

/// Everything the renderer needs from the world for one frame
#[derive(Debug, Default)]
pub struct CollectedScene {
    /// First camera found in traversal order
    pub camera: Option<CameraView>,
    pub opaque: Vec<RenderCommand>,
    pub transparent: Vec<RenderCommand>,
    /// Lights in traversal order
    pub lights: Vec<WorldLight>,
}

/// Walk the world once, in ascending entity index order.
///
/// The first entity with a [`Camera`] becomes the frame's camera; later
/// cameras are ignored. Each [`MeshRenderer`] yields one command, placed in
/// the transparent list if its material is transparent and in the opaque
/// list otherwise. Each [`Light`] is resolved to world space.
pub fn collect_scene(world: &World) -> CollectedScene {
    let mut entities: Vec<Entity> = world.iter_entities().map(|entity| entity.id()).collect();
    entities.sort_unstable_by_key(|entity| entity.index());

    let mut scene = CollectedScene::default();

    for entity in entities {
        let camera = world.get::<Camera>(entity);
        let renderer = world.get::<MeshRenderer>(entity);
        let light = world.get::<Light>(entity);
        if camera.is_none() && renderer.is_none() && light.is_none() {
            continue;
        }

        let matrix = local_to_world(world, entity);

        if scene.camera.is_none() {
            if let Some(camera) = camera {
                scene.camera = Some(CameraView {
                    entity,
                    camera: *camera,
                    local_to_world: matrix,
                });
            }
        }

        if let Some(renderer) = renderer {
            let command =
                RenderCommand::new(matrix, renderer.mesh.clone(), renderer.material.clone());
            if command.material.transparent {
                scene.transparent.push(command);
            } else {
                scene.opaque.push(command);
            }
        }

        if let Some(light) = light {
            scene.lights.push(light.to_world(matrix));
        }
    }

    scene
}
