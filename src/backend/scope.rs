//! Rollback for objects built from several GPU resources

use super::traits::*;

/// A resource created while building a larger object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatedResource {
    Texture(TextureHandle),
    Sampler(SamplerHandle),
    Program(ProgramHandle),
    Framebuffer(FramebufferHandle),
    VertexArray(VertexArrayHandle),
    Mesh(MeshHandle),
}

macro_rules! impl_from_handle {
    ($($handle:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$handle> for CreatedResource {
                fn from(handle: $handle) -> Self {
                    CreatedResource::$variant(handle)
                }
            }
        )*
    };
}

impl_from_handle! {
    TextureHandle => Texture,
    SamplerHandle => Sampler,
    ProgramHandle => Program,
    FramebufferHandle => Framebuffer,
    VertexArrayHandle => VertexArray,
    MeshHandle => Mesh,
}

/// Resources created so far by a multi-step construction.
///
/// If the construction fails, everything tracked is destroyed in reverse
/// creation order so nothing is left without an owner.
#[derive(Debug, Default)]
pub struct CreationScope {
    created: Vec<CreatedResource>,
}

impl CreationScope {
    /// Run `build`, releasing whatever it tracked if it returns an error
    pub fn build<G, T, E>(
        ctx: &mut G,
        build: impl FnOnce(&mut G, &mut CreationScope) -> Result<T, E>,
    ) -> Result<T, E>
    where
        G: GraphicsContext,
    {
        let mut scope = CreationScope::default();
        let result = build(ctx, &mut scope);
        if result.is_err() {
            scope.release(ctx);
        }
        result
    }

    pub fn track(&mut self, resource: impl Into<CreatedResource>) {
        self.created.push(resource.into());
    }

    fn release<G: GraphicsContext>(self, ctx: &mut G) {
        if !self.created.is_empty() {
            log::debug!(
                "Releasing {} partially created resources",
                self.created.len()
            );
        }
        for resource in self.created.into_iter().rev() {
            match resource {
                CreatedResource::Texture(handle) => ctx.destroy_texture(handle),
                CreatedResource::Sampler(handle) => ctx.destroy_sampler(handle),
                CreatedResource::Program(handle) => ctx.destroy_program(handle),
                CreatedResource::Framebuffer(handle) => ctx.destroy_framebuffer(handle),
                CreatedResource::VertexArray(handle) => ctx.destroy_vertex_array(handle),
                CreatedResource::Mesh(handle) => ctx.destroy_mesh(handle),
            }
        }
    }
}
