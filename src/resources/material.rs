//! Material definitions
//!
//! A material pairs a shader program with the fixed-function state it
//! needs and the uniforms common to every object drawn with it. The
//! variants form a closed set so the draw protocol can match on them.

use super::{PipelineState, Sampler, ShaderProgram, Texture2D};
use crate::backend::GraphicsContext;
use glam::Vec4;
use std::sync::Arc;

/// Texture maps used by lit materials
#[derive(Debug, Clone, Default)]
pub struct LitMaps {
    pub albedo: Option<Arc<Texture2D>>,
    pub specular: Option<Arc<Texture2D>>,
    pub roughness: Option<Arc<Texture2D>>,
    pub ambient_occlusion: Option<Arc<Texture2D>>,
    pub emissive: Option<Arc<Texture2D>>,
    pub sampler: Option<Arc<Sampler>>,
}

impl LitMaps {
    /// Uniform names in texture-unit order
    pub const UNIFORMS: [&'static str; 5] = [
        "material.albedo",
        "material.specular",
        "material.roughness",
        "material.ambient_occlusion",
        "material.emissive",
    ];

    fn textures(&self) -> [Option<&Arc<Texture2D>>; 5] {
        [
            self.albedo.as_ref(),
            self.specular.as_ref(),
            self.roughness.as_ref(),
            self.ambient_occlusion.as_ref(),
            self.emissive.as_ref(),
        ]
    }
}

/// Variant-specific material data
#[derive(Debug, Clone)]
pub enum MaterialKind {
    /// Flat color
    Tinted { tint: Vec4 },
    /// Color texture modulated by a tint, with alpha-tested cutout
    Textured {
        tint: Vec4,
        texture: Arc<Texture2D>,
        sampler: Arc<Sampler>,
    },
    /// Lit by the frame's lights; needs camera and light uniforms at draw time
    Lit { maps: LitMaps },
}

/// A surface description shared by many render commands
#[derive(Debug, Clone)]
pub struct Material {
    pub shader: Arc<ShaderProgram>,
    pub pipeline_state: PipelineState,
    pub transparent: bool,
    /// Fragments with alpha below this are discarded
    pub alpha_threshold: f32,
    pub kind: MaterialKind,
}

impl Material {
    pub fn tinted(shader: Arc<ShaderProgram>, tint: Vec4) -> Self {
        Self::new(shader, MaterialKind::Tinted { tint })
    }

    pub fn textured(
        shader: Arc<ShaderProgram>,
        texture: Arc<Texture2D>,
        sampler: Arc<Sampler>,
    ) -> Self {
        Self::new(
            shader,
            MaterialKind::Textured {
                tint: Vec4::ONE,
                texture,
                sampler,
            },
        )
    }

    pub fn lit(shader: Arc<ShaderProgram>, maps: LitMaps) -> Self {
        Self::new(shader, MaterialKind::Lit { maps })
    }

    fn new(shader: Arc<ShaderProgram>, kind: MaterialKind) -> Self {
        Self {
            shader,
            pipeline_state: PipelineState::new(),
            transparent: false,
            alpha_threshold: 0.0,
            kind,
        }
    }

    pub fn with_pipeline_state(mut self, pipeline_state: PipelineState) -> Self {
        self.pipeline_state = pipeline_state;
        self
    }

    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    pub fn with_alpha_threshold(mut self, alpha_threshold: f32) -> Self {
        self.alpha_threshold = alpha_threshold;
        self
    }

    /// Replace the tint of a tinted or textured material; lit materials ignore it
    pub fn with_tint(mut self, color: Vec4) -> Self {
        match &mut self.kind {
            MaterialKind::Tinted { tint } | MaterialKind::Textured { tint, .. } => *tint = color,
            MaterialKind::Lit { .. } => {}
        }
        self
    }

    pub fn is_lit(&self) -> bool {
        matches!(self.kind, MaterialKind::Lit { .. })
    }

    /// Apply pipeline state, make the shader current and bind the
    /// uniforms and textures that do not depend on the drawn object.
    pub fn setup<G: GraphicsContext>(&self, ctx: &mut G) {
        self.pipeline_state.setup(ctx);
        self.shader.bind(ctx);

        match &self.kind {
            MaterialKind::Tinted { tint } => {
                self.shader.set(ctx, "tint", *tint);
            }
            MaterialKind::Textured {
                tint,
                texture,
                sampler,
            } => {
                self.shader.set(ctx, "tint", *tint);
                self.shader.set(ctx, "alphaThreshold", self.alpha_threshold);
                texture.bind(ctx, 0);
                sampler.bind(ctx, 0);
                self.shader.set(ctx, "tex", 0);
            }
            MaterialKind::Lit { maps } => {
                self.shader.set(ctx, "alphaThreshold", self.alpha_threshold);
                for (unit, (texture, name)) in
                    maps.textures().into_iter().zip(LitMaps::UNIFORMS).enumerate()
                {
                    let Some(texture) = texture else {
                        continue;
                    };
                    let unit = unit as u32;
                    texture.bind(ctx, unit);
                    if let Some(sampler) = &maps.sampler {
                        sampler.bind(ctx, unit);
                    }
                    self.shader.set(ctx, name, unit as i32);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{
        Capability, GlCall, RecordingContext, SamplerDescriptor, ShaderSource, UniformValue,
    };
    use crate::resources::TextureData;

    fn shader(ctx: &mut RecordingContext) -> Arc<ShaderProgram> {
        Arc::new(
            ShaderProgram::create(ctx, ShaderSource::new("test.vert", "test.frag")).unwrap(),
        )
    }

    fn texture(ctx: &mut RecordingContext) -> Arc<Texture2D> {
        Arc::new(Texture2D::upload(ctx, &TextureData::white(), true).unwrap())
    }

    #[test]
    fn tinted_sets_tint() {
        let mut ctx = RecordingContext::new();
        let material = Material::tinted(shader(&mut ctx), Vec4::new(1.0, 0.0, 0.0, 1.0));
        material.setup(&mut ctx);

        let program = material.shader.handle;
        assert_eq!(ctx.state().program, Some(program));
        assert_eq!(
            ctx.uniform(program, "tint"),
            Some(UniformValue::Vec4(Vec4::new(1.0, 0.0, 0.0, 1.0)))
        );
        assert!(!material.is_lit());
    }

    #[test]
    fn textured_binds_unit_zero() {
        let mut ctx = RecordingContext::new();
        let shader = shader(&mut ctx);
        let texture = texture(&mut ctx);
        let sampler =
            Arc::new(Sampler::create(&mut ctx, SamplerDescriptor::default()).unwrap());
        let material = Material::textured(shader, texture.clone(), sampler.clone())
            .with_alpha_threshold(0.5);
        material.setup(&mut ctx);

        let program = material.shader.handle;
        assert_eq!(ctx.state().textures.get(&0), Some(&texture.handle));
        assert_eq!(ctx.state().samplers.get(&0), Some(&sampler.handle));
        assert_eq!(ctx.uniform(program, "tex"), Some(UniformValue::Int(0)));
        assert_eq!(
            ctx.uniform(program, "alphaThreshold"),
            Some(UniformValue::Float(0.5))
        );
        assert_eq!(
            ctx.uniform(program, "tint"),
            Some(UniformValue::Vec4(Vec4::ONE))
        );
    }

    #[test]
    fn lit_binds_present_maps_to_their_units() {
        let mut ctx = RecordingContext::new();
        let shader = shader(&mut ctx);
        let albedo = texture(&mut ctx);
        let emissive = texture(&mut ctx);
        let sampler =
            Arc::new(Sampler::create(&mut ctx, SamplerDescriptor::default()).unwrap());
        let material = Material::lit(
            shader,
            LitMaps {
                albedo: Some(albedo.clone()),
                emissive: Some(emissive.clone()),
                sampler: Some(sampler),
                ..Default::default()
            },
        );
        material.setup(&mut ctx);

        let program = material.shader.handle;
        assert!(material.is_lit());
        assert_eq!(ctx.state().textures.get(&0), Some(&albedo.handle));
        assert_eq!(ctx.state().textures.get(&4), Some(&emissive.handle));
        assert_eq!(ctx.state().textures.get(&1), None);
        assert_eq!(
            ctx.uniform(program, "material.emissive"),
            Some(UniformValue::Int(4))
        );
        assert_eq!(ctx.uniform(program, "material.specular"), None);
    }

    #[test]
    fn pipeline_state_applied_before_shader() {
        let mut ctx = RecordingContext::new();
        let material = Material::tinted(shader(&mut ctx), Vec4::ONE)
            .with_pipeline_state(PipelineState::opaque());
        ctx.take_calls();
        material.setup(&mut ctx);

        let calls = ctx.calls();
        assert_eq!(calls[0], GlCall::Enable(Capability::FaceCulling));
        let use_index = calls
            .iter()
            .position(|call| matches!(call, GlCall::UseProgram(_)))
            .unwrap();
        let blend_index = calls
            .iter()
            .position(|call| matches!(call, GlCall::Disable(Capability::Blend)))
            .unwrap();
        assert!(blend_index < use_index);
    }

    #[test]
    fn with_tint_ignored_for_lit() {
        let mut ctx = RecordingContext::new();
        let lit = Material::lit(shader(&mut ctx), LitMaps::default()).with_tint(Vec4::ZERO);
        assert!(lit.is_lit());
    }
}
