//! Fullscreen post-processing effects
//!
//! While an effect is active the scene is drawn into [`RenderTargets`]
//! instead of the default framebuffer. Each effect then samples the color
//! target in a fullscreen triangle drawn onto the default framebuffer.

mod targets;

pub use targets::RenderTargets;

use crate::backend::{
    CreationScope, GraphicsContext, PrimitiveTopology, SamplerDescriptor, ShaderSource,
    VertexArrayHandle,
};
use crate::config::FULLSCREEN_VERTEX_SHADER;
use crate::error::RendererResult;
use crate::resources::{Material, MaterialKind, PipelineState, Sampler, ShaderProgram};
use glam::UVec2;
use std::path::Path;
use std::sync::Arc;

/// A fullscreen effect applied after the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    Crash,
    Boost,
}

/// Offscreen targets plus the compiled effect programs
#[derive(Debug)]
pub struct PostProcess {
    targets: RenderTargets,
    vertex_array: VertexArrayHandle,
    sampler: Arc<Sampler>,
    crash: Material,
    boost: Option<Material>,
}

impl PostProcess {
    /// Create the targets and compile the crash program, plus the boost
    /// program when a fragment shader for it is given.
    pub fn create<G: GraphicsContext>(
        ctx: &mut G,
        size: UVec2,
        crash_fragment: &Path,
        boost_fragment: Option<&Path>,
    ) -> RendererResult<Self> {
        CreationScope::build(ctx, |ctx, scope| -> RendererResult<Self> {
            let targets = RenderTargets::create(ctx, size)?;
            targets.track(scope);
            let vertex_array = ctx.create_vertex_array()?;
            scope.track(vertex_array);
            let sampler = Arc::new(Sampler::create(
                ctx,
                SamplerDescriptor {
                    label: Some("postprocess".into()),
                    ..Default::default()
                },
            )?);
            scope.track(sampler.handle);

            let crash_shader = ShaderProgram::create(
                ctx,
                ShaderSource::new(FULLSCREEN_VERTEX_SHADER, crash_fragment),
            )?;
            scope.track(crash_shader.handle);
            let crash = Self::effect_material(crash_shader, &targets, &sampler);

            let boost = match boost_fragment {
                Some(fragment) => {
                    let shader = ShaderProgram::create(
                        ctx,
                        ShaderSource::new(FULLSCREEN_VERTEX_SHADER, fragment),
                    )?;
                    scope.track(shader.handle);
                    Some(Self::effect_material(shader, &targets, &sampler))
                }
                None => None,
            };

            log::info!(
                "Post-processing enabled (crash: {}, boost: {})",
                crash_fragment.display(),
                boost_fragment.map_or_else(|| "none".to_string(), |p| p.display().to_string())
            );

            Ok(Self {
                targets,
                vertex_array,
                sampler,
                crash,
                boost,
            })
        })
    }

    fn effect_material(
        shader: ShaderProgram,
        targets: &RenderTargets,
        sampler: &Arc<Sampler>,
    ) -> Material {
        let pipeline_state = PipelineState {
            depth_mask: false,
            ..PipelineState::new()
        };
        Material::textured(Arc::new(shader), targets.color.clone(), sampler.clone())
            .with_pipeline_state(pipeline_state)
    }

    pub fn targets(&self) -> &RenderTargets {
        &self.targets
    }

    pub fn has_effect(&self, effect: Effect) -> bool {
        self.material(effect).is_some()
    }

    pub fn material(&self, effect: Effect) -> Option<&Material> {
        match effect {
            Effect::Crash => Some(&self.crash),
            Effect::Boost => self.boost.as_ref(),
        }
    }

    /// Send subsequent scene draws to the offscreen targets
    pub fn redirect<G: GraphicsContext>(&self, ctx: &mut G) {
        self.targets.bind(ctx);
    }

    /// Draw `effect` onto the default framebuffer.
    ///
    /// Returns false, and touches nothing, when the effect has no program.
    pub fn apply<G: GraphicsContext>(&self, ctx: &mut G, effect: Effect) -> bool {
        let Some(material) = self.material(effect) else {
            return false;
        };

        ctx.bind_framebuffer(None);
        ctx.bind_vertex_array(self.vertex_array);
        material.setup(ctx);
        ctx.draw_arrays(PrimitiveTopology::TriangleList, 0, 3);
        true
    }

    /// Recreate the targets at `size` and point the effects at the new color target
    pub fn resize<G: GraphicsContext>(&mut self, ctx: &mut G, size: UVec2) -> RendererResult<()> {
        if size == self.targets.size {
            return Ok(());
        }

        let targets = RenderTargets::create(ctx, size)?;
        let old = std::mem::replace(&mut self.targets, targets);
        old.destroy(ctx);

        let color = self.targets.color.clone();
        for material in std::iter::once(&mut self.crash).chain(self.boost.as_mut()) {
            if let MaterialKind::Textured { texture, .. } = &mut material.kind {
                *texture = color.clone();
            }
        }
        Ok(())
    }

    pub fn destroy<G: GraphicsContext>(self, ctx: &mut G) {
        self.crash.shader.destroy(ctx);
        if let Some(boost) = &self.boost {
            boost.shader.destroy(ctx);
        }
        self.sampler.destroy(ctx);
        ctx.destroy_vertex_array(self.vertex_array);
        self.targets.destroy(ctx);
        log::info!("Post-processing destroyed");
    }
}
