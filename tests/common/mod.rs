//! Common utilities for renderer integration tests.
//!
//! Builds small worlds with shared meshes and materials and provides
//! helpers for inspecting the recorded call stream.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

pub use forward_renderer::backend::{FramebufferHandle, MeshHandle};

use forward_renderer::backend::{GlCall, SamplerDescriptor, ShaderSource, TextureHandle};
use forward_renderer::glam::{Quat, UVec2, Vec3, Vec4};
use forward_renderer::prelude::*;

pub const VIEWPORT: UVec2 = UVec2::new(640, 480);

/// Initialize logging once per test binary.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Write a tiny PNG sky texture into a per-test temporary directory.
pub fn write_sky_texture(test_name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "forward-renderer-{}-{}",
        std::process::id(),
        test_name
    ));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("sky.png");
    image::RgbaImage::from_pixel(8, 4, image::Rgba([40, 80, 220, 255]))
        .save(&path)
        .unwrap();
    path
}

/// A 2x2 black and white checker encoded as PNG.
pub fn checker_png() -> Vec<u8> {
    let img = image::RgbaImage::from_fn(2, 2, |x, y| {
        if (x + y) % 2 == 0 {
            image::Rgba([255, 255, 255, 255])
        } else {
            image::Rgba([0, 0, 0, 255])
        }
    });
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageOutputFormat::Png,
        )
        .unwrap();
    bytes
}

// ============================================================================
// Scene Building
// ============================================================================

/// A recording context plus shared assets for building test worlds.
pub struct TestScene {
    pub ctx: RecordingContext,
    pub world: World,
    pub cube: Arc<Mesh>,
    pub opaque: Arc<Material>,
    pub transparent: Arc<Material>,
    pub lit: Arc<Material>,
}

impl TestScene {
    pub fn new() -> Self {
        init_logging();
        let mut ctx = RecordingContext::new();

        let unlit_shader = Arc::new(
            ShaderProgram::create(&mut ctx, ShaderSource::new("tinted.vert", "tinted.frag"))
                .unwrap(),
        );
        let lit_shader = Arc::new(
            ShaderProgram::create(&mut ctx, ShaderSource::new("lit.vert", "lit.frag")).unwrap(),
        );

        let cube = Arc::new(Mesh::upload(&mut ctx, &MeshData::cube()).unwrap());
        let opaque = Arc::new(
            Material::tinted(unlit_shader.clone(), Vec4::new(0.8, 0.2, 0.2, 1.0))
                .with_pipeline_state(PipelineState::opaque()),
        );
        let transparent = Arc::new(
            Material::tinted(unlit_shader, Vec4::new(0.2, 0.2, 0.8, 0.5))
                .with_pipeline_state(PipelineState::alpha_blended())
                .with_transparent(true),
        );
        let lit = Arc::new(
            Material::lit(lit_shader, LitMaps::default())
                .with_pipeline_state(PipelineState::opaque()),
        );

        ctx.take_calls();

        Self {
            ctx,
            world: World::new(),
            cube,
            opaque,
            transparent,
            lit,
        }
    }

    /// Camera at `position` looking down -Z.
    pub fn spawn_camera(&mut self, position: Vec3) -> Entity {
        self.world
            .spawn((
                Camera::new(Projection::perspective(60.0, 0.1, 100.0)),
                Transform::from_position(position),
            ))
            .id()
    }

    /// Camera at `position` with a rotation.
    pub fn spawn_rotated_camera(&mut self, position: Vec3, rotation: Quat) -> Entity {
        self.world
            .spawn((
                Camera::new(Projection::perspective(60.0, 0.1, 100.0)),
                Transform::from_position_rotation(position, rotation),
            ))
            .id()
    }

    /// A cube with its own mesh handle so draws can be told apart.
    pub fn spawn_object(&mut self, material: Arc<Material>, position: Vec3) -> (Entity, MeshHandle) {
        let mesh = Arc::new(Mesh::upload(&mut self.ctx, &MeshData::cube()).unwrap());
        let handle = mesh.handle;
        let entity = self
            .world
            .spawn((
                MeshRenderer::new(mesh, material),
                Transform::from_position(position),
            ))
            .id();
        self.ctx.take_calls();
        (entity, handle)
    }

    pub fn spawn_opaque(&mut self, position: Vec3) -> MeshHandle {
        let material = self.opaque.clone();
        self.spawn_object(material, position).1
    }

    pub fn spawn_transparent(&mut self, position: Vec3) -> MeshHandle {
        let material = self.transparent.clone();
        self.spawn_object(material, position).1
    }

    pub fn spawn_lit(&mut self, position: Vec3) -> MeshHandle {
        let material = self.lit.clone();
        self.spawn_object(material, position).1
    }

    /// A subdivided ground plane at `height` with a checker texture decoded
    /// from in-memory PNG bytes. Returns the mesh and texture handles.
    pub fn spawn_ground(&mut self, height: f32) -> (MeshHandle, TextureHandle) {
        let pixels = TextureData::from_bytes(&checker_png(), "checker").unwrap();
        let texture = Arc::new(Texture2D::upload(&mut self.ctx, &pixels, true).unwrap());
        let sampler = Arc::new(Sampler::create(&mut self.ctx, SamplerDescriptor::default()).unwrap());
        let shader = Arc::new(
            ShaderProgram::create(&mut self.ctx, ShaderSource::new("textured.vert", "textured.frag"))
                .unwrap(),
        );
        let material = Arc::new(
            Material::textured(shader, texture.clone(), sampler)
                .with_pipeline_state(PipelineState::opaque()),
        );
        let mesh = Arc::new(Mesh::upload(&mut self.ctx, &MeshData::plane(20.0, 20.0, 4)).unwrap());
        let handles = (mesh.handle, texture.handle);

        self.world.spawn((
            MeshRenderer::new(mesh, material),
            Transform::from_position(Vec3::new(0.0, height, 0.0)),
        ));
        self.ctx.take_calls();
        handles
    }

    pub fn spawn_light(&mut self, light: Light, position: Vec3) -> Entity {
        self.world
            .spawn((light, Transform::from_position(position)))
            .id()
    }

    pub fn renderer(&mut self, config: &RendererConfig) -> ForwardRenderer {
        let renderer = ForwardRenderer::initialize(&mut self.ctx, VIEWPORT, config).unwrap();
        self.ctx.take_calls();
        renderer
    }

    pub fn render(&mut self, renderer: &mut ForwardRenderer) {
        renderer.render(&self.world, &mut self.ctx);
    }
}

// ============================================================================
// Call Stream Helpers
// ============================================================================

/// Index of the first call matching `predicate`.
pub fn position_of(calls: &[GlCall], predicate: impl Fn(&GlCall) -> bool) -> Option<usize> {
    calls.iter().position(predicate)
}

/// Index of the draw of `mesh`.
pub fn draw_index(calls: &[GlCall], mesh: MeshHandle) -> usize {
    position_of(calls, |call| {
        matches!(call, GlCall::DrawMesh { mesh: drawn, .. } if *drawn == mesh)
    })
    .unwrap_or_else(|| panic!("mesh {mesh:?} was never drawn"))
}

/// Framebuffer bound when each draw call was issued, in draw order.
pub fn draw_targets(calls: &[GlCall]) -> Vec<Option<FramebufferHandle>> {
    let mut bound = None;
    let mut targets = Vec::new();
    for call in calls {
        match call {
            GlCall::BindFramebuffer(framebuffer) => bound = *framebuffer,
            GlCall::DrawMesh { .. } | GlCall::DrawArrays { .. } => targets.push(bound),
            _ => {}
        }
    }
    targets
}

pub fn fullscreen_draw_count(calls: &[GlCall]) -> usize {
    calls
        .iter()
        .filter(|call| matches!(call, GlCall::DrawArrays { count: 3, .. }))
        .count()
}

