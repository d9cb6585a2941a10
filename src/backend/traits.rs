//! Core graphics context abstraction
//!
//! The renderer never touches global GPU state directly. Every component
//! receives a `&mut G` where `G: GraphicsContext` and issues its state
//! changes, resource creation and draw calls through it.

use crate::backend::types::*;
use glam::Vec4;
use std::path::PathBuf;
use thiserror::Error;

/// Backend error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Failed to create texture: {0}")]
    TextureCreationFailed(String),
    #[error("Failed to create sampler: {0}")]
    SamplerCreationFailed(String),
    #[error("Failed to create framebuffer: {0}")]
    FramebufferCreationFailed(String),
    #[error("Failed to create shader program: {0}")]
    ProgramCreationFailed(String),
    #[error("Failed to create mesh: {0}")]
    MeshCreationFailed(String),
    #[error("Failed to create vertex array: {0}")]
    VertexArrayCreationFailed(String),
    #[error("Out of memory")]
    OutOfMemory,
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Handle to a GPU texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Handle to a sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerHandle(pub u64);

/// Handle to a linked shader program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u64);

/// Handle to an offscreen framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramebufferHandle(pub u64);

/// Handle to a vertex array object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayHandle(pub u64);

/// Handle to uploaded mesh geometry (vertex + index buffers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

/// Source files of a shader program.
///
/// Compilation and linking are the context's business; the renderer only
/// names the stages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderSource {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl ShaderSource {
    pub fn new(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

/// The graphics state machine the renderer drives.
///
/// Implementations are expected to be used from a single thread; the
/// renderer holds `&mut` for the duration of a frame.
pub trait GraphicsContext {
    // Fixed-function state

    /// Turn a fixed-function feature on
    fn enable(&mut self, capability: Capability);

    /// Turn a fixed-function feature off
    fn disable(&mut self, capability: Capability);

    /// Select which faces are culled
    fn cull_face(&mut self, face: Face);

    /// Select the front-face winding
    fn front_face(&mut self, winding: FrontFace);

    /// Set the depth comparison function
    fn depth_func(&mut self, function: CompareFunction);

    /// Set the color write mask
    fn color_mask(&mut self, mask: ColorMask);

    /// Enable or disable depth writes
    fn depth_mask(&mut self, enabled: bool);

    /// Set the blend equation
    fn blend_equation(&mut self, equation: BlendEquation);

    /// Set source and destination blend factors
    fn blend_func(&mut self, source: BlendFactor, destination: BlendFactor);

    /// Set the constant blend color
    fn blend_color(&mut self, color: Vec4);

    /// Set the viewport rectangle
    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Set the color used by `clear`
    fn clear_color(&mut self, color: Vec4);

    /// Set the depth used by `clear`
    fn clear_depth(&mut self, depth: f32);

    /// Clear the bound framebuffer
    fn clear(&mut self, flags: ClearFlags);

    // Shader programs

    /// Compile and link a program from its stage files
    fn create_program(&mut self, source: &ShaderSource) -> BackendResult<ProgramHandle>;

    /// Make a program current
    fn use_program(&mut self, program: ProgramHandle);

    /// Set a named uniform on a program
    fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: UniformValue);

    /// Delete a program
    fn destroy_program(&mut self, program: ProgramHandle);

    // Textures and samplers

    /// Create a texture, optionally with initial RGBA8 pixel data
    fn create_texture(
        &mut self,
        desc: &TextureDescriptor,
        data: Option<&[u8]>,
    ) -> BackendResult<TextureHandle>;

    /// Bind a texture to a texture unit
    fn bind_texture(&mut self, unit: u32, texture: TextureHandle);

    /// Delete a texture
    fn destroy_texture(&mut self, texture: TextureHandle);

    /// Create a sampler
    fn create_sampler(&mut self, desc: &SamplerDescriptor) -> BackendResult<SamplerHandle>;

    /// Bind a sampler to a texture unit
    fn bind_sampler(&mut self, unit: u32, sampler: SamplerHandle);

    /// Delete a sampler
    fn destroy_sampler(&mut self, sampler: SamplerHandle);

    // Framebuffers

    /// Create a framebuffer with one color and one depth attachment
    fn create_framebuffer(
        &mut self,
        color: TextureHandle,
        depth: TextureHandle,
    ) -> BackendResult<FramebufferHandle>;

    /// Bind a draw framebuffer; `None` selects the default framebuffer
    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferHandle>);

    /// Delete a framebuffer
    fn destroy_framebuffer(&mut self, framebuffer: FramebufferHandle);

    // Geometry

    /// Create a vertex array with no attached buffers
    fn create_vertex_array(&mut self) -> BackendResult<VertexArrayHandle>;

    /// Bind a vertex array
    fn bind_vertex_array(&mut self, vertex_array: VertexArrayHandle);

    /// Delete a vertex array
    fn destroy_vertex_array(&mut self, vertex_array: VertexArrayHandle);

    /// Draw non-indexed primitives from the bound vertex array
    fn draw_arrays(&mut self, topology: PrimitiveTopology, first: u32, count: u32);

    /// Upload indexed triangle geometry
    fn create_mesh(&mut self, vertices: &[Vertex], indices: &[u32]) -> BackendResult<MeshHandle>;

    /// Draw uploaded geometry
    fn draw_mesh(&mut self, mesh: MeshHandle, index_count: u32);

    /// Delete uploaded geometry
    fn destroy_mesh(&mut self, mesh: MeshHandle);
}
