//! Sky sphere drawn behind all scene geometry

use crate::backend::{
    AddressMode, CompareFunction, CreationScope, Face, FilterMode, GraphicsContext,
    SamplerDescriptor, ShaderSource,
};
use crate::config::{TEXTURED_FRAGMENT_SHADER, TEXTURED_VERTEX_SHADER};
use crate::error::RendererResult;
use crate::resources::{
    Material, Mesh, MeshData, PipelineState, Sampler, ShaderProgram, Texture2D, TextureData,
};
use glam::{Mat4, Vec3, Vec4};
use std::path::Path;
use std::sync::Arc;

/// Remaps clip-space z to w, which puts every vertex on the far plane
pub const ALWAYS_BEHIND: Mat4 = Mat4::from_cols(
    Vec4::X,
    Vec4::Y,
    Vec4::ZERO,
    Vec4::new(0.0, 0.0, 1.0, 1.0),
);

/// Model matrix of the sky sphere: centered on the camera, never rotated or scaled
pub fn sky_model_matrix(camera_position: Vec3) -> Mat4 {
    Mat4::from_translation(camera_position)
}

/// Full transform bound on the sky shader
pub fn sky_transform(view_projection: Mat4, camera_position: Vec3) -> Mat4 {
    ALWAYS_BEHIND * view_projection * sky_model_matrix(camera_position)
}

/// Textured sphere seen from the inside
#[derive(Debug)]
pub struct SkyRenderer {
    sphere: Mesh,
    material: Material,
    texture: Arc<Texture2D>,
    sampler: Arc<Sampler>,
}

impl SkyRenderer {
    /// Load the sky texture and build the sphere, shader and material
    pub fn create<G: GraphicsContext>(ctx: &mut G, texture_path: &Path) -> RendererResult<Self> {
        let image = TextureData::from_file(texture_path)?;

        let (shader, texture, sampler, sphere) =
            CreationScope::build(ctx, |ctx, scope| -> RendererResult<_> {
                let shader = ShaderProgram::create(
                    ctx,
                    ShaderSource::new(TEXTURED_VERTEX_SHADER, TEXTURED_FRAGMENT_SHADER),
                )?;
                scope.track(shader.handle);
                let texture = Texture2D::upload(ctx, &image, false)?;
                scope.track(texture.handle);
                let sampler = Sampler::create(
                    ctx,
                    SamplerDescriptor {
                        label: Some("sky".into()),
                        mag_filter: FilterMode::Linear,
                        min_filter: FilterMode::Linear,
                        address_mode_s: AddressMode::Repeat,
                        address_mode_t: AddressMode::ClampToEdge,
                    },
                )?;
                scope.track(sampler.handle);
                let sphere = Mesh::upload(ctx, &MeshData::sphere(16, 16))?;
                Ok((shader, texture, sampler, sphere))
            })?;

        let mut pipeline_state = PipelineState::new();
        pipeline_state.depth_testing.enabled = true;
        pipeline_state.depth_testing.function = CompareFunction::LessEqual;
        pipeline_state.face_culling.enabled = true;
        pipeline_state.face_culling.culled_face = Face::Front;

        let texture = Arc::new(texture);
        let sampler = Arc::new(sampler);
        let material = Material::textured(Arc::new(shader), texture.clone(), sampler.clone())
            .with_pipeline_state(pipeline_state)
            .with_alpha_threshold(1.0)
            .with_transparent(false);

        log::info!(
            "Sky created from {} ({}x{})",
            texture_path.display(),
            texture.width,
            texture.height
        );

        Ok(Self {
            sphere,
            material,
            texture,
            sampler,
        })
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn mesh(&self) -> &Mesh {
        &self.sphere
    }

    pub fn draw<G: GraphicsContext>(
        &self,
        ctx: &mut G,
        view_projection: Mat4,
        camera_position: Vec3,
    ) {
        self.material.setup(ctx);
        self.material.shader.set(
            ctx,
            "transform",
            sky_transform(view_projection, camera_position),
        );
        self.sphere.draw(ctx);
    }

    pub fn destroy<G: GraphicsContext>(self, ctx: &mut G) {
        self.sphere.destroy(ctx);
        self.material.shader.destroy(ctx);
        self.texture.destroy(ctx);
        self.sampler.destroy(ctx);
        log::info!("Sky destroyed");
    }
}
