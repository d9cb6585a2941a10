//! Frame orchestration

use crate::backend::{ClearFlags, ColorMask, GraphicsContext};
use crate::config::RendererConfig;
use crate::error::RendererResult;
use crate::pipeline::{
    collect_scene, sort_back_to_front, Effect, FrameUniforms, PostProcess, SkyRenderer,
};
use bevy_ecs::world::World;
use glam::{UVec2, Vec4};

/// Post-processing effects requested for upcoming frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EffectToggles {
    pub crash: bool,
    pub boost: bool,
}

impl EffectToggles {
    pub fn any(&self) -> bool {
        self.crash || self.boost
    }
}

/// Forward renderer for a `bevy_ecs` world.
///
/// Draws every [`MeshRenderer`](crate::scene::MeshRenderer) seen by the
/// first [`Camera`](crate::scene::Camera) in the world: opaque objects in
/// collection order, then the optional sky, then transparent objects sorted
/// back-to-front. When an effect is toggled on and post-processing is
/// configured, the scene goes to an offscreen target and the effect is
/// drawn onto the default framebuffer afterwards.
///
/// GPU resources are released by [`ForwardRenderer::destroy`], which needs
/// the same context that created them.
#[derive(Debug)]
pub struct ForwardRenderer {
    size: UVec2,
    sky: Option<SkyRenderer>,
    postprocess: Option<PostProcess>,
    effects: EffectToggles,
}

impl ForwardRenderer {
    /// Build the subsystems enabled in `config` for a viewport of `size`
    pub fn initialize<G: GraphicsContext>(
        ctx: &mut G,
        size: UVec2,
        config: &RendererConfig,
    ) -> RendererResult<Self> {
        let sky = match &config.sky {
            Some(path) => Some(SkyRenderer::create(ctx, path)?),
            None => None,
        };

        let postprocess = match &config.postprocess {
            Some(crash) => {
                match PostProcess::create(ctx, size, crash, config.energy_post_process.as_deref())
                {
                    Ok(postprocess) => Some(postprocess),
                    Err(err) => {
                        if let Some(sky) = sky {
                            sky.destroy(ctx);
                        }
                        return Err(err);
                    }
                }
            }
            None => None,
        };

        log::info!(
            "Forward renderer initialized at {}x{} (sky: {}, post-processing: {})",
            size.x,
            size.y,
            sky.is_some(),
            postprocess.is_some()
        );

        Ok(Self {
            size,
            sky,
            postprocess,
            effects: EffectToggles::default(),
        })
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn has_sky(&self) -> bool {
        self.sky.is_some()
    }

    pub fn has_postprocess(&self) -> bool {
        self.postprocess.is_some()
    }

    pub fn effects(&self) -> EffectToggles {
        self.effects
    }

    pub fn effects_mut(&mut self) -> &mut EffectToggles {
        &mut self.effects
    }

    pub fn set_crash_effect(&mut self, enabled: bool) {
        self.effects.crash = enabled;
    }

    pub fn set_boost_effect(&mut self, enabled: bool) {
        self.effects.boost = enabled;
    }

    /// Draw one frame of `world`. Does nothing if the world has no camera.
    ///
    /// The scene always goes to an explicitly bound target: the offscreen
    /// framebuffer while an effect is on, the default framebuffer otherwise.
    pub fn render<G: GraphicsContext>(&mut self, world: &World, ctx: &mut G) {
        let scene = collect_scene(world);
        let Some(camera) = scene.camera else {
            log::trace!("No camera in world, skipping frame");
            return;
        };

        let view_projection = camera.view_projection_matrix(self.size);
        let forward = camera.forward();

        ctx.viewport(0, 0, self.size.x, self.size.y);
        ctx.clear_color(Vec4::new(0.0, 0.0, 0.0, 1.0));
        ctx.clear_depth(1.0);
        ctx.color_mask(ColorMask::ALL);
        ctx.depth_mask(true);

        let offscreen = match &self.postprocess {
            Some(postprocess) if self.effects.any() => {
                postprocess.redirect(ctx);
                true
            }
            _ => {
                // A previous frame may have left the offscreen target bound.
                ctx.bind_framebuffer(None);
                false
            }
        };

        ctx.clear(ClearFlags::COLOR_DEPTH);

        let frame = FrameUniforms::new(view_projection, forward, &scene.lights);
        frame.draw_all(ctx, &scene.opaque);

        if let Some(sky) = &self.sky {
            sky.draw(ctx, view_projection, camera.position());
        }

        let mut transparent = scene.transparent;
        sort_back_to_front(&mut transparent, forward);
        frame.draw_all(ctx, &transparent);

        if let Some(postprocess) = &self.postprocess {
            if self.effects.crash {
                postprocess.apply(ctx, Effect::Crash);
            }
            if self.effects.boost && !postprocess.apply(ctx, Effect::Boost) {
                log::trace!("Boost effect requested but no boost program is loaded");
            }
        }

        log::debug!(
            "Frame: {} opaque, {} transparent, {} lights, offscreen: {}",
            scene.opaque.len(),
            transparent.len(),
            scene.lights.len(),
            offscreen
        );
    }

    /// Track a new viewport size, recreating the offscreen targets if any
    pub fn resize<G: GraphicsContext>(&mut self, ctx: &mut G, size: UVec2) -> RendererResult<()> {
        log::debug!("Resizing renderer to {}x{}", size.x, size.y);
        self.size = size;
        if let Some(postprocess) = &mut self.postprocess {
            postprocess.resize(ctx, size)?;
        }
        Ok(())
    }

    /// Release every GPU resource. Calling it again does nothing.
    pub fn destroy<G: GraphicsContext>(&mut self, ctx: &mut G) {
        if let Some(sky) = self.sky.take() {
            sky.destroy(ctx);
        }
        if let Some(postprocess) = self.postprocess.take() {
            postprocess.destroy(ctx);
        }
    }
}

impl Drop for ForwardRenderer {
    fn drop(&mut self) {
        if self.sky.is_some() || self.postprocess.is_some() {
            log::warn!("ForwardRenderer dropped without destroy(); GPU resources leaked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingContext;

    #[test]
    fn default_config_enables_nothing() {
        let mut ctx = RecordingContext::new();
        let mut renderer =
            ForwardRenderer::initialize(&mut ctx, UVec2::new(800, 600), &RendererConfig::default())
                .unwrap();
        assert!(!renderer.has_sky());
        assert!(!renderer.has_postprocess());
        assert_eq!(ctx.live_resource_count(), 0);
        renderer.destroy(&mut ctx);
    }

    #[test]
    fn effect_toggles() {
        let mut ctx = RecordingContext::new();
        let mut renderer =
            ForwardRenderer::initialize(&mut ctx, UVec2::new(800, 600), &RendererConfig::default())
                .unwrap();
        assert!(!renderer.effects().any());

        renderer.set_crash_effect(true);
        assert_eq!(
            renderer.effects(),
            EffectToggles {
                crash: true,
                boost: false
            }
        );
        renderer.effects_mut().boost = true;
        renderer.set_crash_effect(false);
        assert!(renderer.effects().boost);
        assert!(renderer.effects().any());
    }

    #[test]
    fn empty_world_draws_nothing() {
        let mut ctx = RecordingContext::new();
        let mut renderer =
            ForwardRenderer::initialize(&mut ctx, UVec2::new(800, 600), &RendererConfig::default())
                .unwrap();
        renderer.render(&World::new(), &mut ctx);
        assert!(ctx.calls().is_empty());
    }

    #[test]
    fn postprocess_failure_propagates() {
        let mut ctx = RecordingContext::new();
        let config = RendererConfig::default().with_postprocess("crash.frag");
        ctx.set_fail_creation(true);
        let result = ForwardRenderer::initialize(&mut ctx, UVec2::new(64, 64), &config);
        assert!(result.is_err());
        assert_eq!(ctx.live_resource_count(), 0);
    }
}
