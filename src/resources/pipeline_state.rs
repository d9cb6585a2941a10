//! Fixed-function pipeline configuration carried by every material

use crate::backend::{
    BlendEquation, BlendFactor, Capability, ColorMask, CompareFunction, Face, FrontFace,
    GraphicsContext,
};
use glam::Vec4;

/// Face culling options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceCulling {
    pub enabled: bool,
    pub culled_face: Face,
    pub front_face: FrontFace,
}

impl Default for FaceCulling {
    fn default() -> Self {
        Self {
            enabled: false,
            culled_face: Face::Back,
            front_face: FrontFace::Ccw,
        }
    }
}

/// Depth testing options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthTesting {
    pub enabled: bool,
    pub function: CompareFunction,
}

impl Default for DepthTesting {
    fn default() -> Self {
        Self {
            enabled: false,
            function: CompareFunction::LessEqual,
        }
    }
}

/// Blending options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blending {
    pub enabled: bool,
    pub equation: BlendEquation,
    pub source_factor: BlendFactor,
    pub destination_factor: BlendFactor,
    /// Each component in [0, 1]
    pub constant_color: Vec4,
}

impl Default for Blending {
    fn default() -> Self {
        Self {
            enabled: false,
            equation: BlendEquation::Add,
            source_factor: BlendFactor::SrcAlpha,
            destination_factor: BlendFactor::OneMinusSrcAlpha,
            constant_color: Vec4::ZERO,
        }
    }
}

/// Culling, depth, blending and write-mask configuration for one draw.
///
/// Shaders cannot control these options, so each material carries its own
/// copy and applies it before drawing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PipelineState {
    pub face_culling: FaceCulling,
    pub depth_testing: DepthTesting,
    pub blending: Blending,
    pub color_mask: ColorMask,
    pub depth_mask: bool,
}

impl PipelineState {
    /// Opaque geometry: back-face culling and depth testing.
    pub fn opaque() -> Self {
        Self {
            face_culling: FaceCulling {
                enabled: true,
                ..Default::default()
            },
            depth_testing: DepthTesting {
                enabled: true,
                function: CompareFunction::LessEqual,
            },
            ..Self::new()
        }
    }

    /// Alpha-blended geometry that tests but does not write depth.
    pub fn alpha_blended() -> Self {
        Self {
            depth_testing: DepthTesting {
                enabled: true,
                function: CompareFunction::LessEqual,
            },
            blending: Blending {
                enabled: true,
                ..Default::default()
            },
            depth_mask: false,
            ..Self::new()
        }
    }

    /// All features off, all write masks on.
    pub fn new() -> Self {
        Self {
            face_culling: FaceCulling::default(),
            depth_testing: DepthTesting::default(),
            blending: Blending::default(),
            color_mask: ColorMask::ALL,
            depth_mask: true,
        }
    }

    /// Apply this configuration to the context.
    ///
    /// Every enable flag is written, so nothing leaks from the previous draw.
    /// The color and depth masks are only written while depth testing is
    /// enabled; with depth testing off they keep whatever the previous draw
    /// left behind.
    pub fn setup<G: GraphicsContext>(&self, ctx: &mut G) {
        if self.face_culling.enabled {
            ctx.enable(Capability::FaceCulling);
            ctx.cull_face(self.face_culling.culled_face);
            ctx.front_face(self.face_culling.front_face);
        } else {
            ctx.disable(Capability::FaceCulling);
        }

        if self.depth_testing.enabled {
            ctx.enable(Capability::DepthTest);
            ctx.depth_func(self.depth_testing.function);
            ctx.color_mask(self.color_mask);
            ctx.depth_mask(self.depth_mask);
        } else {
            ctx.disable(Capability::DepthTest);
        }

        if self.blending.enabled {
            ctx.enable(Capability::Blend);
            ctx.blend_equation(self.blending.equation);
            ctx.blend_func(
                self.blending.source_factor,
                self.blending.destination_factor,
            );
            ctx.blend_color(self.blending.constant_color.clamp(Vec4::ZERO, Vec4::ONE));
        } else {
            ctx.disable(Capability::Blend);
        }
    }
}
