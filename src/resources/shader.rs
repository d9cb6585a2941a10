//! Shader program handles

use crate::backend::{BackendResult, GraphicsContext, ProgramHandle, ShaderSource, UniformValue};

/// A linked shader program.
///
/// The program's contents are opaque to the renderer; it only makes the
/// program current and binds named uniforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderProgram {
    pub handle: ProgramHandle,
    pub source: ShaderSource,
}

impl ShaderProgram {
    /// Compile and link a program from its stage files
    pub fn create<G: GraphicsContext>(ctx: &mut G, source: ShaderSource) -> BackendResult<Self> {
        let handle = ctx.create_program(&source)?;
        log::debug!(
            "Created shader program {:?} ({} + {})",
            handle,
            source.vertex.display(),
            source.fragment.display()
        );
        Ok(Self { handle, source })
    }

    /// Make this program current
    pub fn bind<G: GraphicsContext>(&self, ctx: &mut G) {
        ctx.use_program(self.handle);
    }

    /// Set a named uniform
    pub fn set<G: GraphicsContext>(&self, ctx: &mut G, name: &str, value: impl Into<UniformValue>) {
        ctx.set_uniform(self.handle, name, value.into());
    }

    pub fn destroy<G: GraphicsContext>(&self, ctx: &mut G) {
        ctx.destroy_program(self.handle);
    }
}
