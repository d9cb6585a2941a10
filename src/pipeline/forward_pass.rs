//! Per-command draw protocol

use super::RenderCommand;
use crate::backend::GraphicsContext;
use crate::resources::{Material, ShaderProgram};
use crate::scene::WorldLight;
use glam::{Mat4, Vec3};

/// Ambient sky colors bound on every lit material
pub const SKY_TOP: Vec3 = Vec3::new(0.0, 0.1, 0.5);
pub const SKY_HORIZON: Vec3 = Vec3::new(0.3, 0.3, 0.3);
pub const SKY_BOTTOM: Vec3 = Vec3::new(0.1, 0.1, 0.1);

/// Per-frame values shared by every draw
#[derive(Debug, Clone, Copy)]
pub struct FrameUniforms<'a> {
    pub view_projection: Mat4,
    /// Camera forward direction, bound as `eye` on lit materials
    pub eye: Vec3,
    pub lights: &'a [WorldLight],
}

impl<'a> FrameUniforms<'a> {
    pub fn new(view_projection: Mat4, eye: Vec3, lights: &'a [WorldLight]) -> Self {
        Self {
            view_projection,
            eye,
            lights,
        }
    }

    /// Set up the command's material, bind its uniforms and draw the mesh
    pub fn draw<G: GraphicsContext>(&self, ctx: &mut G, command: &RenderCommand) {
        let material: &Material = &command.material;
        material.setup(ctx);

        let shader = material.shader.as_ref();
        if material.is_lit() {
            self.bind_lit(ctx, shader, command.local_to_world);
        } else {
            shader.set(
                ctx,
                "transform",
                self.view_projection * command.local_to_world,
            );
        }

        command.mesh.draw(ctx);
    }

    /// Draw every command in order
    pub fn draw_all<G: GraphicsContext>(&self, ctx: &mut G, commands: &[RenderCommand]) {
        for command in commands {
            self.draw(ctx, command);
        }
    }

    fn bind_lit<G: GraphicsContext>(&self, ctx: &mut G, shader: &ShaderProgram, model: Mat4) {
        shader.set(ctx, "VP", self.view_projection);
        shader.set(ctx, "eye", self.eye);
        shader.set(ctx, "light_count", self.lights.len() as i32);
        shader.set(ctx, "M", model);
        shader.set(ctx, "M_IT", model.inverse().transpose());

        shader.set(ctx, "sky.top", SKY_TOP);
        shader.set(ctx, "sky.horizon", SKY_HORIZON);
        shader.set(ctx, "sky.bottom", SKY_BOTTOM);

        for (i, light) in self.lights.iter().enumerate() {
            let prefix = format!("lights[{i}]");
            shader.set(ctx, &format!("{prefix}.position"), light.position);
            shader.set(ctx, &format!("{prefix}.direction"), light.direction);
            shader.set(ctx, &format!("{prefix}.type"), light.light_type.as_uniform());
            shader.set(ctx, &format!("{prefix}.diffuse"), light.diffuse);
            shader.set(ctx, &format!("{prefix}.specular"), light.specular);
            shader.set(ctx, &format!("{prefix}.attenuation"), light.attenuation);
            shader.set(ctx, &format!("{prefix}.cone_angles"), light.cone_angles);
        }
    }
}
