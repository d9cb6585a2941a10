//! Offscreen color and depth targets

use crate::backend::{
    BackendResult, CreationScope, FramebufferHandle, GraphicsContext, TextureFormat,
};
use crate::resources::Texture2D;
use glam::UVec2;
use std::sync::Arc;

/// Framebuffer with a color and a depth attachment the scene is drawn into
/// while an effect is active
#[derive(Debug)]
pub struct RenderTargets {
    pub color: Arc<Texture2D>,
    pub depth: Texture2D,
    pub framebuffer: FramebufferHandle,
    pub size: UVec2,
}

impl RenderTargets {
    pub fn create<G: GraphicsContext>(ctx: &mut G, size: UVec2) -> BackendResult<Self> {
        CreationScope::build(ctx, |ctx, scope| -> BackendResult<Self> {
            let color =
                Texture2D::empty(ctx, TextureFormat::Rgba8Unorm, size, "postprocess_color")?;
            scope.track(color.handle);
            let depth = Texture2D::empty(ctx, TextureFormat::Depth24, size, "postprocess_depth")?;
            scope.track(depth.handle);
            let framebuffer = ctx.create_framebuffer(color.handle, depth.handle)?;

            log::debug!(
                "Created post-process targets {}x{} (framebuffer {:?})",
                size.x,
                size.y,
                framebuffer
            );

            Ok(Self {
                color: Arc::new(color),
                depth,
                framebuffer,
                size,
            })
        })
    }

    /// Register the attachments and framebuffer with an enclosing construction
    pub fn track(&self, scope: &mut CreationScope) {
        scope.track(self.color.handle);
        scope.track(self.depth.handle);
        scope.track(self.framebuffer);
    }

    pub fn bind<G: GraphicsContext>(&self, ctx: &mut G) {
        ctx.bind_framebuffer(Some(self.framebuffer));
    }

    pub fn destroy<G: GraphicsContext>(self, ctx: &mut G) {
        ctx.destroy_framebuffer(self.framebuffer);
        self.color.destroy(ctx);
        self.depth.destroy(ctx);
    }
}
