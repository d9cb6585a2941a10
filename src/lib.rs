//! Forward Renderer - draws a Bevy ECS world through an injected graphics context
//!
//! The renderer never talks to a GPU API directly. Every state change,
//! resource creation and draw goes through the [`GraphicsContext`] trait,
//! so a frame can be replayed against a real backend or inspected with the
//! [`RecordingContext`].
//!
//! # Features
//! - Opaque pass followed by a back-to-front sorted transparent pass
//! - Per-material pipeline state (culling, depth, blending, write masks)
//! - Multi-light uniform binding for lit materials
//! - Sky sphere forced onto the far plane
//! - Fullscreen post-processing effects through an offscreen target
//!
//! # Example
//! ```no_run
//! use forward_renderer::prelude::*;
//! use forward_renderer::glam::{UVec2, Vec3};
//!
//! let mut ctx = RecordingContext::new();
//! let config = RendererConfig::from_json_str(r#"{ "sky": "assets/textures/sky.jpg" }"#)?;
//! let mut renderer = ForwardRenderer::initialize(&mut ctx, UVec2::new(1280, 720), &config)?;
//!
//! let mut world = World::new();
//! world.spawn((Camera::default(), Transform::from_position(Vec3::new(0.0, 1.0, 5.0))));
//!
//! renderer.render(&world, &mut ctx);
//! renderer.destroy(&mut ctx);
//! # Ok::<(), RendererError>(())
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod renderer;
pub mod resources;
pub mod scene;

// Re-export Bevy ECS prelude for users
pub use bevy_ecs::prelude::*;
pub use glam;

pub use backend::{GraphicsContext, RecordingContext};
pub use config::RendererConfig;
pub use error::{RendererError, RendererResult};
pub use renderer::{EffectToggles, ForwardRenderer};

/// Everything needed to build a scene and render it
pub mod prelude {
    pub use crate::backend::{GraphicsContext, RecordingContext};
    pub use crate::config::RendererConfig;
    pub use crate::error::{RendererError, RendererResult};
    pub use crate::renderer::{EffectToggles, ForwardRenderer};
    pub use crate::resources::{
        LitMaps, Material, MaterialKind, Mesh, MeshData, PipelineState, Sampler, ShaderProgram,
        Texture2D, TextureData,
    };
    pub use crate::scene::{Camera, Light, LightType, MeshRenderer, Parent, Projection, Transform};
    pub use bevy_ecs::prelude::*;
}
